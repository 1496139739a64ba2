//! Per-zipcode analytics: average price, price distributions, and average
//! price by bedroom and floor count. Prices are reported in thousands.

use crate::domain::AnalyzedListing;
use crate::math::{Histogram, mean};

#[derive(Debug, Clone, PartialEq)]
pub struct ZipcodeAnalytics {
    pub zipcode: u32,
    pub listings: usize,
    /// Mean sale price, thousands.
    pub mean_price_k: Option<f64>,
    /// Sale price distribution, thousands.
    pub price_hist_k: Option<Histogram>,
    /// Price per living sqft distribution, dollars.
    pub price_per_sqft_hist: Option<Histogram>,
    /// `(bedrooms, mean price in thousands)`, ascending by bedrooms.
    pub by_bedrooms: Vec<(u32, f64)>,
    /// `(floors, mean price in thousands)`, ascending by floors.
    pub by_floors: Vec<(f64, f64)>,
}

impl ZipcodeAnalytics {
    pub fn compute(listings: &[AnalyzedListing], zipcode: u32) -> Self {
        let rows: Vec<&AnalyzedListing> = listings
            .iter()
            .filter(|a| a.listing.zipcode == zipcode)
            .collect();

        let prices_k: Vec<f64> = rows.iter().map(|a| a.listing.price / 1000.0).collect();
        let per_sqft: Vec<f64> = rows
            .iter()
            .map(|a| a.listing.features.price_per_living_sqft)
            .collect();

        let by_bedrooms = group_means(
            rows.iter()
                .map(|a| (f64::from(a.listing.bedrooms), a.listing.price / 1000.0)),
        )
        .into_iter()
        .map(|(k, v)| (k as u32, v))
        .collect();
        let by_floors = group_means(rows.iter().map(|a| (a.listing.floors, a.listing.price / 1000.0)));

        Self {
            zipcode,
            listings: rows.len(),
            mean_price_k: mean(&prices_k),
            price_hist_k: Histogram::auto(&prices_k),
            price_per_sqft_hist: Histogram::auto(&per_sqft),
            by_bedrooms,
            by_floors,
        }
    }
}

/// Mean of the values sharing each key, ascending by key.
fn group_means(pairs: impl Iterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    let mut pairs: Vec<(f64, f64)> = pairs.collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out: Vec<(f64, f64)> = Vec::new();
    let mut start = 0;
    while start < pairs.len() {
        let key = pairs[start].0;
        let end = pairs[start..]
            .iter()
            .position(|p| p.0 != key)
            .map_or(pairs.len(), |off| start + off);

        let values: Vec<f64> = pairs[start..end].iter().map(|p| p.1).collect();
        if let Some(m) = mean(&values) {
            out.push((key, m));
        }
        start = end;
    }
    out
}
