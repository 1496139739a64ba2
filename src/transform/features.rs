//! Derived per-listing columns.
//!
//! Everything here is a pure function of a single row; no aggregation.

use chrono::Datelike;

use crate::domain::{Features, RawListing};

/// Compute the derived columns for one record.
///
/// Ratios are left unguarded: a zero area yields an infinite or NaN ratio.
pub fn derive(raw: &RawListing) -> Features {
    Features {
        month: raw.date.month(),
        renovated: raw.yr_renovated > 0,
        price_per_living_sqft: raw.price / raw.sqft_living,
        price_per_lot_sqft: raw.price / raw.sqft_lot,
    }
}
