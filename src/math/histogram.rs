//! Fixed-width histograms with automatic bin selection.
//!
//! The bin width is the smaller of the Freedman–Diaconis and Sturges
//! estimates (numpy's `auto` rule), falling back to Sturges when the
//! interquartile range is zero.

use crate::math::stats::quantile_sorted;

/// Upper bound on the bin count; terminal charts cannot show more.
pub const MAX_BINS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` long, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Build a histogram over the finite entries of `values`.
    ///
    /// Returns `None` if there are no finite values.
    pub fn auto(values: &[f64]) -> Option<Self> {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        finite.sort_by(f64::total_cmp);

        let bins = auto_bin_count(&finite);
        Self::from_sorted(&finite, bins)
    }

    /// Build a histogram with exactly `bins` equal-width bins.
    pub fn with_bins(values: &[f64], bins: usize) -> Option<Self> {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        finite.sort_by(f64::total_cmp);
        Self::from_sorted(&finite, bins)
    }

    fn from_sorted(sorted: &[f64], bins: usize) -> Option<Self> {
        let (mut lo, mut hi) = (*sorted.first()?, *sorted.last()?);
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);

        let mut counts = vec![0usize; bins];
        for &v in sorted {
            // The last bin is closed on the right.
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    /// `(lower_edge, upper_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(e, &c)| (e[0], e[1], c))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn range(&self) -> [f64; 2] {
        [
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(1.0),
        ]
    }
}

fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    let span = sorted[n - 1] - sorted[0];
    if n < 2 || span <= 0.0 {
        return 1;
    }

    let sturges = span / ((n as f64).log2() + 1.0);
    let iqr = match (quantile_sorted(sorted, 0.75), quantile_sorted(sorted, 0.25)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr / (n as f64).cbrt();

    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    ((span / width).ceil() as usize).clamp(1, MAX_BINS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_finite_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 9.0, f64::NAN, f64::INFINITY];
        let h = Histogram::auto(&values).unwrap();
        assert_eq!(h.total(), 5);
        assert_eq!(h.edges.len(), h.counts.len() + 1);
        assert_eq!(h.range(), [1.0, 9.0]);
    }

    #[test]
    fn max_value_lands_in_last_bin() {
        let h = Histogram::with_bins(&[0.0, 5.0, 10.0], 2).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
    }

    #[test]
    fn constant_values_get_one_padded_bin() {
        let h = Histogram::auto(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(h.counts, vec![3]);
        assert_eq!(h.range(), [3.5, 4.5]);
    }

    #[test]
    fn auto_uses_sturges_for_small_samples() {
        // n = 4, span = 3: sturges width = 3 / 3 = 1, fd = 2 * 1.5 / 4^(1/3) ≈ 1.89.
        let h = Histogram::auto(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(h.counts.len(), 3);
    }

    #[test]
    fn no_finite_values_yields_none() {
        assert!(Histogram::auto(&[f64::NAN]).is_none());
        assert!(Histogram::auto(&[]).is_none());
    }
}
