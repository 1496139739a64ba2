//! `house-recs` library crate.
//!
//! The binary (`houses`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - the text report and the TUI share one view model
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod market;
pub mod math;
pub mod report;
pub mod transform;
pub mod tui;

#[cfg(test)]
mod test_support;
