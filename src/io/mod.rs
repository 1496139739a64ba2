//! Input helpers.
//!
//! - CSV ingest for the house-sales layout (`ingest`)

pub mod ingest;

pub use ingest::*;
