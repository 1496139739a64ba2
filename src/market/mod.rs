//! Market analysis: zipcode aggregates joined back onto every listing.
//!
//! Two aggregation passes run over the same rows, both grouped by zipcode:
//!
//! - median sale price (`median_price`)
//! - median sale price per month, reduced to the best month
//!   (`high_month`, `high_median_price`)
//!
//! The joined aggregates then drive the row-wise buy/sell decision.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{AnalyzedListing, Listing, ZipcodeMarket};
use crate::math::median;

pub mod decision;
pub mod season;

pub use decision::{Decision, decide};
pub use season::{best_month, best_sell_months, monthly_medians};

/// Headline numbers of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSummary {
    pub listings: usize,
    pub zipcodes: usize,
    pub buys: usize,
}

#[derive(Debug, Clone)]
pub struct MarketAnalysis {
    /// Input order is preserved.
    pub listings: Vec<AnalyzedListing>,
    pub markets: BTreeMap<u32, ZipcodeMarket>,
    pub summary: MarketSummary,
}

/// Median sale price per zipcode.
pub fn zipcode_medians(listings: &[Listing]) -> BTreeMap<u32, f64> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for l in listings {
        groups.entry(l.zipcode).or_default().push(l.price);
    }
    groups
        .into_iter()
        .filter_map(|(zipcode, prices)| median(&prices).map(|m| (zipcode, m)))
        .collect()
}

/// Both zipcode passes merged into one lookup table.
pub fn zipcode_markets(listings: &[Listing]) -> BTreeMap<u32, ZipcodeMarket> {
    let medians = zipcode_medians(listings);
    let seasons = best_sell_months(listings);

    medians
        .into_iter()
        .filter_map(|(zipcode, median_price)| {
            let &(high_month, high_median_price) = seasons.get(&zipcode)?;
            Some((
                zipcode,
                ZipcodeMarket {
                    median_price,
                    high_month,
                    high_median_price,
                },
            ))
        })
        .collect()
}

/// Run both aggregation passes, join them onto each listing, and decide.
pub fn analyze(listings: Vec<Listing>) -> MarketAnalysis {
    let markets = zipcode_markets(&listings);
    debug!(zipcodes = markets.len(), "zipcode aggregates computed");

    // Both tables are built from `listings`, so every zipcode has an entry.
    let analyzed: Vec<AnalyzedListing> = listings
        .into_iter()
        .filter_map(|listing| {
            let market = *markets.get(&listing.zipcode)?;
            let Decision {
                buy,
                sell_price,
                profit,
            } = decide(&listing, &market);
            Some(AnalyzedListing {
                listing,
                market,
                buy,
                sell_price,
                profit,
            })
        })
        .collect();

    let summary = MarketSummary {
        listings: analyzed.len(),
        zipcodes: markets.len(),
        buys: analyzed.iter().filter(|a| a.buy).count(),
    };
    info!(
        listings = summary.listings,
        zipcodes = summary.zipcodes,
        buys = summary.buys,
        "market analysis complete"
    );

    MarketAnalysis {
        listings: analyzed,
        markets,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{analyze, raw};

    #[test]
    fn median_price_is_broadcast_to_every_row() {
        let out = analyze(vec![
            raw(1, 98001, 100.0, 1),
            raw(2, 98001, 200.0, 2),
            raw(3, 98001, 300.0, 3),
            raw(4, 98002, 999.0, 3),
        ]);
        for a in out.iter().filter(|a| a.listing.zipcode == 98001) {
            assert_eq!(a.market.median_price, 200.0);
        }
        assert_eq!(out[3].market.median_price, 999.0);
    }

    #[test]
    fn seasonal_peak_is_joined() {
        let out = analyze(vec![
            raw(1, 98001, 100.0, 1),
            raw(2, 98001, 300.0, 6),
            raw(3, 98001, 150.0, 12),
        ]);
        for a in &out {
            assert_eq!(a.market.high_month, 6);
            assert_eq!(a.market.high_median_price, 300.0);
        }
    }

    #[test]
    fn identical_prices_degenerate_gracefully() {
        let out = analyze(vec![raw(1, 98001, 250.0, 1), raw(2, 98001, 250.0, 4)]);
        for a in &out {
            assert_eq!(a.market.median_price, 250.0);
            assert_eq!(a.market.high_month, 1);
            assert!(!a.buy, "price equal to the median is not a buy");
        }
    }

    #[test]
    fn decision_invariants_hold_for_every_row() {
        let mut rows = Vec::new();
        for i in 0..40u64 {
            let mut r = raw(i, 98000 + (i % 3) as u32, 100_000.0 + 7_919.0 * i as f64, (i % 12) as u32 + 1);
            r.condition = (i % 5) as u8 + 1;
            r.grade = (i % 6) as u8 + 5;
            r.yr_renovated = if i % 4 == 0 { 2001 } else { 0 };
            rows.push(r);
        }
        let out = analyze(rows);
        assert_eq!(out.len(), 40);

        for a in &out {
            let l = &a.listing;
            assert_eq!(l.features.renovated, l.yr_renovated > 0);

            let expected_buy = l.price < a.market.median_price && l.condition > 3 && l.grade > 7;
            assert_eq!(a.buy, expected_buy);

            if a.buy {
                let sell = a.sell_price.unwrap();
                let expected = if l.price > a.market.high_median_price {
                    l.price * 1.1
                } else {
                    l.price * 1.3
                };
                assert!((sell - expected).abs() < 1e-6);
                assert!((a.profit.unwrap() - (sell - l.price)).abs() < 1e-6);
            } else {
                assert_eq!(a.sell_price, None);
                assert_eq!(a.profit, None);
            }
        }
    }
}
