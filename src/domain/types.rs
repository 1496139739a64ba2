//! Shared domain types.
//!
//! A listing moves through three shapes on its way to the dashboard:
//!
//! - `RawListing`: one CSV record, all 21 source columns
//! - `Listing`: derived features added, neighbourhood columns dropped
//! - `AnalyzedListing`: joined with its zipcode market and the buy/sell decision

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::io::ingest::{de_date, de_whole};

/// Number of columns in the source layout.
pub const SOURCE_COLUMNS: usize = 21;

/// Canonical column names, in file order. Any header in the file is replaced by these.
pub const COLUMN_NAMES: [&str; SOURCE_COLUMNS] = [
    "id",
    "date",
    "price",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "waterfront",
    "view",
    "condition",
    "grade",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "zipcode",
    "lat",
    "long",
    "sqft_living15",
    "sqft_lot15",
];

/// One source record, deserialized positionally.
///
/// Field order must match `COLUMN_NAMES`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawListing {
    pub id: u64,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    pub price: f64,
    #[serde(deserialize_with = "de_whole")]
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: f64,
    #[serde(deserialize_with = "de_whole")]
    pub waterfront: u8,
    #[serde(deserialize_with = "de_whole")]
    pub view: u8,
    #[serde(deserialize_with = "de_whole")]
    pub condition: u8,
    #[serde(deserialize_with = "de_whole")]
    pub grade: u8,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    #[serde(deserialize_with = "de_whole")]
    pub yr_built: i32,
    #[serde(deserialize_with = "de_whole")]
    pub yr_renovated: i32,
    #[serde(deserialize_with = "de_whole")]
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
    /// Living area of the 15 nearest neighbours.
    pub sqft_living15: f64,
    /// Lot area of the 15 nearest neighbours.
    pub sqft_lot15: f64,
}

/// Row-wise derived columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    /// Calendar month of the sale (1..=12).
    pub month: u32,
    pub renovated: bool,
    /// `price / sqft_living`; non-finite when the living area is zero.
    pub price_per_living_sqft: f64,
    /// `price / sqft_lot`; non-finite when the lot area is zero.
    pub price_per_lot_sqft: f64,
}

/// A listing after feature derivation and column filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub date: NaiveDate,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: f64,
    pub waterfront: u8,
    pub view: u8,
    pub condition: u8,
    pub grade: u8,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
    pub features: Features,
}

/// Aggregates computed once per zipcode and joined onto each of its rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZipcodeMarket {
    pub median_price: f64,
    /// Month whose median sale price is the highest seen in the zipcode.
    pub high_month: u32,
    pub high_median_price: f64,
}

/// A listing with its market context and the buy/sell decision.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedListing {
    pub listing: Listing,
    pub market: ZipcodeMarket,
    pub buy: bool,
    /// Projected resale price; `None` unless `buy`.
    pub sell_price: Option<f64>,
    /// `sell_price - price`; `None` unless `buy`.
    pub profit: Option<f64>,
}

/// A run's configuration as understood by the pipeline and the dashboard.
///
/// Derived from CLI flags, `.env`, and defaults.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Initial lower price bound, in thousands.
    pub price_low_k: Option<u32>,
    /// Initial upper price bound, in thousands.
    pub price_high_k: Option<u32>,
    /// Initially selected zipcode for the analytics view.
    pub zipcode: Option<u32>,
    /// Slider step in thousands for the TUI.
    pub price_step_k: u32,
    /// Maximum table rows printed by `report`.
    pub table_limit: Option<usize>,
}
