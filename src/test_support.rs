//! Builders shared by unit tests.

use chrono::NaiveDate;

use crate::domain::{AnalyzedListing, RawListing};
use crate::transform::{derive, drop_neighbor_columns};

/// A plausible record: 3 bed, 1 bath, 1180 sqft on a 5650 sqft lot.
pub fn raw(id: u64, zipcode: u32, price: f64, month: u32) -> RawListing {
    RawListing {
        id,
        date: NaiveDate::from_ymd_opt(2014, month, 13).unwrap(),
        price,
        bedrooms: 3,
        bathrooms: 1.0,
        sqft_living: 1180.0,
        sqft_lot: 5650.0,
        floors: 1.0,
        waterfront: 0,
        view: 0,
        condition: 4,
        grade: 8,
        sqft_above: 1180.0,
        sqft_basement: 0.0,
        yr_built: 1955,
        yr_renovated: 0,
        zipcode,
        lat: 47.5112,
        long: -122.257,
        sqft_living15: 1340.0,
        sqft_lot15: 5650.0,
    }
}

/// Run the full pipeline on in-memory records.
pub fn analyze(rows: Vec<RawListing>) -> Vec<AnalyzedListing> {
    let listings = rows
        .iter()
        .map(|r| drop_neighbor_columns(r, derive(r)))
        .collect::<Vec<_>>();
    crate::market::analyze(listings).listings
}
