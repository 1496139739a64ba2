//! Tracing setup.
//!
//! `HOUSES_LOG` (an `EnvFilter` directive) wins over `--log-level`. The text
//! report logs to stderr; the TUI owns the terminal, so it logs to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const LOG_ENV: &str = "HOUSES_LOG";

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber.
pub fn init(level: &str, target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::runtime(format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).try_init()
        }
    };

    installed.map_err(|e| AppError::runtime(format!("Failed to initialize logging: {e}")))
}
