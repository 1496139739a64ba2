//! Buy / sell decision for a single listing against its zipcode market.

use crate::domain::{Listing, ZipcodeMarket};

/// A listing must be in better than this condition to be a buy.
pub const MIN_CONDITION: u8 = 3;
/// A listing must be graded above this to be a buy.
pub const MIN_GRADE: u8 = 7;
/// Resale markup when the purchase price is already above the zipcode's peak-month median.
pub const MARKUP_ABOVE_PEAK: f64 = 1.1;
/// Resale markup otherwise.
pub const MARKUP_BELOW_PEAK: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub buy: bool,
    pub sell_price: Option<f64>,
    pub profit: Option<f64>,
}

/// Below the zipcode median, condition > 3 and grade > 7.
pub fn is_buy(listing: &Listing, market: &ZipcodeMarket) -> bool {
    listing.price < market.median_price
        && listing.condition > MIN_CONDITION
        && listing.grade > MIN_GRADE
}

/// Projected resale price for a listing that is bought.
pub fn sell_price(price: f64, market: &ZipcodeMarket) -> f64 {
    if price > market.high_median_price {
        price * MARKUP_ABOVE_PEAK
    } else {
        price * MARKUP_BELOW_PEAK
    }
}

pub fn decide(listing: &Listing, market: &ZipcodeMarket) -> Decision {
    if !is_buy(listing, market) {
        return Decision {
            buy: false,
            sell_price: None,
            profit: None,
        };
    }

    let sell = sell_price(listing.price, market);
    Decision {
        buy: true,
        sell_price: Some(sell),
        profit: Some(sell - listing.price),
    }
}
