//! Presentation data: the recommendation view, price filtering, totals and
//! per-zipcode analytics.
//!
//! Nothing here draws; both the TUI and `houses report` call `build_view`
//! with the current `Selection` and render what comes back.

use chrono::NaiveDate;

use crate::domain::AnalyzedListing;

pub mod format;
pub mod zipcode;

pub use format::*;
pub use zipcode::*;

/// Column headers of the recommendation table, in display order.
pub const RECOMMENDATION_COLUMNS: [&str; 22] = [
    "id",
    "date",
    "price",
    "recom sell price",
    "expected return",
    "recom sell month",
    "zipcode",
    "condition",
    "grade",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "sqft_above",
    "sqft_basement",
    "floors",
    "water_front",
    "view",
    "yr_built",
    "yr_renovated",
    "lat",
    "long",
];

/// One row of the "recommended houses" table.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: u64,
    pub date: NaiveDate,
    pub price: f64,
    pub sell_price: f64,
    pub expected_return: f64,
    pub sell_month: u32,
    pub zipcode: u32,
    pub condition: u8,
    pub grade: u8,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub floors: f64,
    pub waterfront: u8,
    pub view: u8,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub lat: f64,
    pub long: f64,
}

impl Recommendation {
    /// Project a bought listing; `None` for listings that are not buys.
    pub fn from_analyzed(a: &AnalyzedListing) -> Option<Self> {
        if !a.buy {
            return None;
        }
        let l = &a.listing;
        Some(Self {
            id: l.id,
            date: l.date,
            price: l.price,
            sell_price: a.sell_price?,
            expected_return: a.profit?,
            sell_month: a.market.high_month,
            zipcode: l.zipcode,
            condition: l.condition,
            grade: l.grade,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            sqft_living: l.sqft_living,
            sqft_lot: l.sqft_lot,
            sqft_above: l.sqft_above,
            sqft_basement: l.sqft_basement,
            floors: l.floors,
            waterfront: l.waterfront,
            view: l.view,
            yr_built: l.yr_built,
            yr_renovated: l.yr_renovated,
            lat: l.lat,
            long: l.long,
        })
    }

    /// Cell values in `RECOMMENDATION_COLUMNS` order.
    pub fn cells(&self) -> [String; 22] {
        [
            self.id.to_string(),
            self.date.to_string(),
            format!("{:.2}", self.price),
            format!("{:.2}", self.sell_price),
            format!("{:.2}", self.expected_return),
            self.sell_month.to_string(),
            self.zipcode.to_string(),
            self.condition.to_string(),
            self.grade.to_string(),
            self.bedrooms.to_string(),
            format!("{}", self.bathrooms),
            format!("{}", self.sqft_living),
            format!("{}", self.sqft_lot),
            format!("{}", self.sqft_above),
            format!("{}", self.sqft_basement),
            format!("{}", self.floors),
            self.waterfront.to_string(),
            self.view.to_string(),
            self.yr_built.to_string(),
            self.yr_renovated.to_string(),
            format!("{:.4}", self.lat),
            format!("{:.3}", self.long),
        ]
    }
}

/// All buy rows, in input order.
pub fn recommendations(listings: &[AnalyzedListing]) -> Vec<Recommendation> {
    listings.iter().filter_map(Recommendation::from_analyzed).collect()
}

/// Slider limits in thousands, derived from the recommended prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min_k: u64,
    pub max_k: u64,
}

impl PriceBounds {
    /// `floor(min / 1000)` to `floor(max / 1000) + 1`; `None` without recommendations.
    pub fn from_recommendations(recs: &[Recommendation]) -> Option<Self> {
        let (lo, hi) = recs
            .iter()
            .map(|r| r.price)
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })?;

        Some(Self {
            min_k: (lo / 1000.0).floor().max(0.0) as u64,
            max_k: ((hi / 1000.0).floor().max(0.0) as u64).saturating_add(1),
        })
    }
}

/// Inclusive price window in thousands; `low_k <= high_k` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub low_k: u64,
    pub high_k: u64,
}

impl PriceRange {
    pub fn full(bounds: PriceBounds) -> Self {
        Self {
            low_k: bounds.min_k,
            high_k: bounds.max_k,
        }
    }

    /// Build a range from optional user input, clamped into `bounds`.
    pub fn clamped(bounds: PriceBounds, low_k: Option<u64>, high_k: Option<u64>) -> Self {
        let low = low_k.unwrap_or(bounds.min_k).clamp(bounds.min_k, bounds.max_k);
        let high = high_k.unwrap_or(bounds.max_k).clamp(bounds.min_k, bounds.max_k);
        Self {
            low_k: low.min(high),
            high_k: high.max(low),
        }
    }

    /// Move the lower bound by `delta_k`, never past the upper bound.
    pub fn shift_low(self, delta_k: i64, bounds: PriceBounds) -> Self {
        let low = shift(self.low_k, delta_k, bounds.min_k, self.high_k);
        Self { low_k: low, ..self }
    }

    /// Move the upper bound by `delta_k`, never below the lower bound.
    pub fn shift_high(self, delta_k: i64, bounds: PriceBounds) -> Self {
        let high = shift(self.high_k, delta_k, self.low_k, bounds.max_k);
        Self { high_k: high, ..self }
    }

    pub fn low(&self) -> f64 {
        self.low_k as f64 * 1000.0
    }

    pub fn high(&self) -> f64 {
        self.high_k as f64 * 1000.0
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low() && price <= self.high()
    }
}

fn shift(value: u64, delta: i64, min: u64, max: u64) -> u64 {
    (i128::from(value) + i128::from(delta)).clamp(i128::from(min), i128::from(max)) as u64
}

/// Recommendations whose price falls inside `range`.
pub fn filter_by_price(recs: &[Recommendation], range: PriceRange) -> Vec<Recommendation> {
    recs.iter().filter(|r| range.contains(r.price)).cloned().collect()
}

/// Investment and expected return over a set of recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub investment: f64,
    pub expected_return: f64,
}

impl Totals {
    pub fn of(recs: &[Recommendation]) -> Self {
        Self {
            count: recs.len(),
            investment: recs.iter().map(|r| r.price).sum(),
            expected_return: recs.iter().map(|r| r.expected_return).sum(),
        }
    }

    /// Expected return as a percentage of the investment; `None` for an empty set.
    pub fn return_pct(&self) -> Option<f64> {
        (self.investment > 0.0).then(|| 100.0 * self.expected_return / self.investment)
    }
}

/// Distinct zipcodes of all listings (not only buys), ascending.
pub fn zipcodes(listings: &[AnalyzedListing]) -> Vec<u32> {
    let mut out: Vec<u32> = listings.iter().map(|a| a.listing.zipcode).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// What the user has currently picked in the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// `None` means the full slider range.
    pub price: Option<PriceRange>,
    /// `None` means the first zipcode.
    pub zipcode: Option<u32>,
}

/// Everything the presentation layer shows for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub recommended: usize,
    pub bounds: Option<PriceBounds>,
    /// The selection's price range after clamping into `bounds`.
    pub range: Option<PriceRange>,
    pub filtered: Vec<Recommendation>,
    pub totals: Totals,
    pub zipcodes: Vec<u32>,
    pub zipcode: Option<u32>,
    pub analytics: Option<ZipcodeAnalytics>,
}

/// Recompute the whole view for `selection`.
///
/// Called again on every input change; nothing is cached between calls.
pub fn build_view(listings: &[AnalyzedListing], selection: &Selection) -> DashboardView {
    let recs = recommendations(listings);
    let bounds = PriceBounds::from_recommendations(&recs);

    let range = bounds.map(|b| match selection.price {
        Some(r) => PriceRange::clamped(b, Some(r.low_k), Some(r.high_k)),
        None => PriceRange::full(b),
    });
    let filtered = match range {
        Some(r) => filter_by_price(&recs, r),
        None => Vec::new(),
    };
    let totals = Totals::of(&filtered);

    let zipcodes = zipcodes(listings);
    let zipcode = selection
        .zipcode
        .filter(|z| zipcodes.binary_search(z).is_ok())
        .or_else(|| zipcodes.first().copied());
    let analytics = zipcode.map(|z| ZipcodeAnalytics::compute(listings, z));

    DashboardView {
        recommended: recs.len(),
        bounds,
        range,
        filtered,
        totals,
        zipcodes,
        zipcode,
        analytics,
    }
}
