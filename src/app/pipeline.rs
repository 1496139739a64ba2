//! Shared pipeline used by both the text report and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> feature derivation -> column filter -> market analysis
//!
//! Front-ends then focus on presentation: they hold a `PipelineOutput` and
//! ask it for a `DashboardView` whenever the selection changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{AnalyzedListing, DashboardConfig, Listing, ZipcodeMarket};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_listings};
use crate::market::MarketSummary;
use crate::report::{DashboardView, Selection};
use crate::transform::{derive, drop_neighbor_columns};

/// All computed outputs of a single pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub source: PathBuf,
    pub rows_read: usize,
    pub header_skipped: bool,
    pub listings: Vec<AnalyzedListing>,
    pub markets: BTreeMap<u32, ZipcodeMarket>,
    pub summary: MarketSummary,
}

impl PipelineOutput {
    /// Presentation data for `selection`.
    pub fn view(&self, selection: &Selection) -> DashboardView {
        crate::report::build_view(&self.listings, selection)
    }
}

/// Load the configured CSV and run every stage.
pub fn run_pipeline(config: &DashboardConfig) -> Result<PipelineOutput, AppError> {
    // 1) Ingest.
    let ingest = load_listings(&config.data_path)?;
    Ok(run_with_ingest(&config.data_path, ingest))
}

/// Run the transformation stages on already-ingested records.
pub fn run_with_ingest(source: &Path, ingest: IngestedData) -> PipelineOutput {
    let IngestedData {
        listings,
        rows_read,
        header_skipped,
    } = ingest;

    // 2) Derive features, 3) drop the neighbourhood columns.
    let listings: Vec<Listing> = listings
        .iter()
        .map(|raw| drop_neighbor_columns(raw, derive(raw)))
        .collect();
    debug!(rows = listings.len(), "features derived");

    // 4) Zipcode aggregates + buy/sell decision.
    let analysis = crate::market::analyze(listings);

    PipelineOutput {
        source: source.to_path_buf(),
        rows_read,
        header_skipped,
        listings: analysis.listings,
        markets: analysis.markets,
        summary: analysis.summary,
    }
}
