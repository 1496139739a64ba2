//! Plain-text rendering of the dashboard for `houses report`.
//!
//! We keep formatting code in one place so the TUI and the text report agree
//! on labels and number formats.

use crate::math::Histogram;
use crate::report::{DashboardView, PriceRange, RECOMMENDATION_COLUMNS, Recommendation, Totals, ZipcodeAnalytics};

/// Header block: data source and headline counts.
pub fn format_summary(source: &str, rows: usize, zipcodes: usize, view: &DashboardView) -> String {
    let mut out = String::new();
    out.push_str("=== Houses recommendation ===\n");
    out.push_str(&format!("Data: {source}\n"));
    out.push_str(&format!(
        "Listings: {rows} | zipcodes: {zipcodes} | recommended: {}\n",
        view.recommended
    ));
    match (view.bounds, view.range) {
        (Some(bounds), Some(range)) => {
            out.push_str(&format!(
                "Price range (x 1000): {}..{} of {}..{}\n",
                range.low_k, range.high_k, bounds.min_k, bounds.max_k
            ));
            out.push_str(&format_price_range(range));
            out.push('\n');
        }
        _ => out.push_str("No recommended houses.\n"),
    }
    out
}

/// `View prices between $X and $Y`.
pub fn format_price_range(range: PriceRange) -> String {
    format!(
        "View prices between ${} and ${}",
        fmt_money(range.low()),
        fmt_money(range.high())
    )
}

/// Investment and expected return lines.
pub fn format_totals(totals: &Totals) -> String {
    let pct = totals
        .return_pct()
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Investment ${}\nExpected return ${} ({pct})\n",
        fmt_money(totals.investment),
        fmt_money(totals.expected_return),
    )
}

/// The main recommendation columns as a fixed-width table.
///
/// Only the first `limit` rows are printed when a limit is given.
pub fn format_recommendations(recs: &[Recommendation], limit: Option<usize>) -> String {
    // id, date, price, sell, return, month, zipcode, condition, grade, bedrooms
    const SHOWN: usize = 10;
    const WIDTHS: [usize; SHOWN] = [12, 10, 13, 16, 15, 16, 7, 9, 5, 8];

    let mut out = String::new();
    let header: Vec<String> = RECOMMENDATION_COLUMNS[..SHOWN]
        .iter()
        .zip(WIDTHS)
        .map(|(name, w)| format!("{name:>w$}"))
        .collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    let rule: Vec<String> = WIDTHS.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join(" "));
    out.push('\n');

    let shown = limit.unwrap_or(recs.len()).min(recs.len());
    for r in &recs[..shown] {
        let cells = r.cells();
        let row: Vec<String> = cells[..SHOWN]
            .iter()
            .zip(WIDTHS)
            .map(|(cell, w)| format!("{:>w$}", truncate(cell, w)))
            .collect();
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }
    if shown < recs.len() {
        out.push_str(&format!("... {} more\n", recs.len() - shown));
    }
    out
}

/// Zipcode analytics with ASCII bar charts `width` columns wide.
pub fn format_analytics(a: &ZipcodeAnalytics, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Zipcode {} ({} listings)\n", a.zipcode, a.listings));
    match a.mean_price_k {
        Some(m) => out.push_str(&format!("Average price ${} k\n", fmt_money(m))),
        None => out.push_str("Average price -\n"),
    }

    out.push_str("\nPrice ($ thousand)\n");
    out.push_str(&format_histogram(a.price_hist_k.as_ref(), width));
    out.push_str("\nPrice / living sqft ($)\n");
    out.push_str(&format_histogram(a.price_per_sqft_hist.as_ref(), width));

    let bedrooms: Vec<(String, f64)> = a.by_bedrooms.iter().map(|&(k, v)| (k.to_string(), v)).collect();
    out.push_str("\nAverage price ($ thousand) by bedrooms\n");
    out.push_str(&format_bars(&bedrooms, width));

    let floors: Vec<(String, f64)> = a.by_floors.iter().map(|&(k, v)| (format!("{k}"), v)).collect();
    out.push_str("\nAverage price ($ thousand) by floors\n");
    out.push_str(&format_bars(&floors, width));
    out
}

fn format_histogram(hist: Option<&Histogram>, width: usize) -> String {
    let Some(hist) = hist else {
        return "  (no data)\n".to_string();
    };
    let max = hist.max_count().max(1);
    let mut out = String::new();
    for (lo, hi, count) in hist.bins() {
        let len = bar_len(count as f64, max as f64, width);
        out.push_str(&format!("{:>10.1} - {:<10.1} |{} {count}\n", lo, hi, "#".repeat(len)));
    }
    out
}

fn format_bars(bars: &[(String, f64)], width: usize) -> String {
    if bars.is_empty() {
        return "  (no data)\n".to_string();
    }
    let max = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    let mut out = String::new();
    for (label, value) in bars {
        let len = bar_len(*value, max, width);
        out.push_str(&format!("{label:>6} |{} {value:.1}\n", "#".repeat(len)));
    }
    out
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 {
        return 0;
    }
    ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize
}

/// `1234567.891` -> `1,234,567.89`.
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
