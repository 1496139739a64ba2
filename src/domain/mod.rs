//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the source record layout (`RawListing`, `COLUMN_NAMES`)
//! - derived and filtered listings (`Features`, `Listing`)
//! - market outputs (`ZipcodeMarket`, `AnalyzedListing`)
//! - run configuration (`DashboardConfig`)

pub mod types;

pub use types::*;
