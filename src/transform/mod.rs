//! Row-wise transformation stages between ingest and market analysis.
//!
//! - feature derivation (`features`)
//! - column filtering (`filter`)

pub mod features;
pub mod filter;

pub use features::*;
pub use filter::*;
