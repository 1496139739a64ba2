//! CSV ingest.
//!
//! Turns a house-sales CSV with the fixed 21-column layout into `RawListing`s.
//!
//! Design goals:
//! - **Fixed schema**: columns are positional; any header row is discarded and
//!   the canonical names from `COLUMN_NAMES` apply
//! - **Fail fast**: a wrong column count or an unparsable cell aborts the load
//!   with the offending line (and column, when csv can tell) (exit code 2)
//! - **Separation of concerns**: no derived columns or aggregation here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::domain::{COLUMN_NAMES, RawListing, SOURCE_COLUMNS};
use crate::error::AppError;

/// Ingest output: parsed records plus a little bookkeeping for logs and headers.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub listings: Vec<RawListing>,
    pub rows_read: usize,
    pub header_skipped: bool,
}

/// Load every record of the CSV at `path`.
pub fn load_listings(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let data = read_listings(file, &path.display().to_string())?;
    info!(
        path = %path.display(),
        rows = data.rows_read,
        header_skipped = data.header_skipped,
        "loaded listings"
    );
    Ok(data)
}

/// Parse listings from any reader. `source` is only used in error messages.
pub fn read_listings<R: Read>(input: R, source: &str) -> Result<IngestedData, AppError> {
    // Column counts are checked per record below so the error can name the line.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut listings = Vec::new();
    let mut header_skipped = false;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::input(format!("Failed to read CSV '{source}': {e}")))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 1);

        if idx == 0 && is_header(&record) {
            debug!(line, "discarding header row");
            header_skipped = true;
            continue;
        }

        listings.push(parse_record(&record, line, source)?);
    }

    if listings.is_empty() {
        return Err(AppError::empty(format!("No data rows found in '{source}'.")));
    }

    Ok(IngestedData {
        rows_read: listings.len(),
        listings,
        header_skipped,
    })
}

/// A first record whose `id` cell is not an integer is a header.
fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|cell| cell.trim_start_matches('\u{feff}').parse::<u64>().is_err())
        .unwrap_or(false)
}

fn parse_record(record: &StringRecord, line: u64, source: &str) -> Result<RawListing, AppError> {
    if record.len() != SOURCE_COLUMNS {
        return Err(AppError::input(format!(
            "{source}:{line}: expected {SOURCE_COLUMNS} columns, found {}.",
            record.len()
        )));
    }

    let listing = record
        .deserialize::<RawListing>(None)
        .map_err(|e| AppError::input(format!("{source}:{line}: {}", describe_csv_error(&e))))?;

    // `NaN` and `inf` parse as f64; prices must be finite.
    if !listing.price.is_finite() {
        return Err(AppError::input(format!(
            "{source}:{line}: invalid `price` value: {}",
            listing.price
        )));
    }
    Ok(listing)
}

fn describe_csv_error(err: &csv::Error) -> String {
    if let csv::ErrorKind::Deserialize { err, .. } = err.kind() {
        if let Some(name) = err.field().and_then(|i| COLUMN_NAMES.get(i as usize)) {
            return format!("invalid `{name}` value: {}", err.kind());
        }
    }
    err.to_string()
}

/// Parse a sale date.
///
/// The King County export writes `20141013T000000`; ISO and US forms are
/// accepted too since re-saved spreadsheets tend to rewrite the column.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATETIME_FMTS: [&str; 3] = ["%Y%m%dT%H%M%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    let s = s.trim();
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "invalid date '{s}'; expected YYYYMMDDTHHMMSS, YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or MM/DD/YYYY"
    ))
}

pub(crate) fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(D::Error::custom)
}

/// Integer columns are sometimes exported as `3.0`; accept those, reject `3.5`.
pub(crate) fn de_whole<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let v = f64::deserialize(deserializer)?;
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(D::Error::custom(format!("expected a whole number, got {v}")));
    }
    T::try_from(v as i64).map_err(|_| D::Error::custom(format!("{v} is out of range")))
}
