//! Seasonal pass: which month sells highest in each zipcode.

use std::collections::BTreeMap;

use crate::domain::Listing;
use crate::math::median;

/// Median sale price per (zipcode, month).
pub fn monthly_medians(listings: &[Listing]) -> BTreeMap<u32, BTreeMap<u32, f64>> {
    let mut groups: BTreeMap<u32, BTreeMap<u32, Vec<f64>>> = BTreeMap::new();
    for l in listings {
        groups
            .entry(l.zipcode)
            .or_default()
            .entry(l.features.month)
            .or_default()
            .push(l.price);
    }

    groups
        .into_iter()
        .map(|(zipcode, months)| {
            let medians = months
                .into_iter()
                .filter_map(|(month, prices)| median(&prices).map(|m| (month, m)))
                .collect();
            (zipcode, medians)
        })
        .collect()
}

/// The month with the highest median; the lowest month number wins a tie.
pub fn best_month(medians: &BTreeMap<u32, f64>) -> Option<(u32, f64)> {
    let mut best: Option<(u32, f64)> = None;
    // Ascending iteration plus a strict comparison keeps the earliest month on ties.
    for (&month, &value) in medians {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((month, value)),
        }
    }
    best
}

/// `(high_month, high_median_price)` per zipcode.
pub fn best_sell_months(listings: &[Listing]) -> BTreeMap<u32, (u32, f64)> {
    monthly_medians(listings)
        .into_iter()
        .filter_map(|(zipcode, months)| best_month(&months).map(|best| (zipcode, best)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::raw;
    use crate::transform::{derive, drop_neighbor_columns};

    fn listings(rows: &[(u32, f64, u32)]) -> Vec<Listing> {
        rows.iter()
            .enumerate()
            .map(|(i, &(zip, price, month))| {
                let r = raw(i as u64, zip, price, month);
                drop_neighbor_columns(&r, derive(&r))
            })
            .collect()
    }

    #[test]
    fn picks_month_with_highest_median() {
        let medians = BTreeMap::from([(1, 100.0), (6, 300.0), (12, 150.0)]);
        assert_eq!(best_month(&medians), Some((6, 300.0)));
    }

    #[test]
    fn ties_go_to_lowest_month() {
        let medians = BTreeMap::from([(3, 250.0), (7, 250.0), (11, 100.0)]);
        assert_eq!(best_month(&medians), Some((3, 250.0)));
    }

    #[test]
    fn empty_has_no_best_month() {
        assert_eq!(best_month(&BTreeMap::new()), None);
    }

    #[test]
    fn monthly_medians_group_by_zipcode_and_month() {
        let ls = listings(&[
            (98001, 100.0, 1),
            (98001, 300.0, 1),
            (98001, 500.0, 6),
            (98002, 50.0, 6),
        ]);
        let m = monthly_medians(&ls);
        assert_eq!(m[&98001][&1], 200.0);
        assert_eq!(m[&98001][&6], 500.0);
        assert_eq!(m[&98002][&6], 50.0);
    }

    #[test]
    fn single_month_zipcode_uses_that_month() {
        let ls = listings(&[(98010, 400.0, 9), (98010, 600.0, 9)]);
        assert_eq!(best_sell_months(&ls)[&98010], (9, 500.0));
    }
}
