//! Descriptive statistics over run records
//!
//! Everything here is derived from the per-run samples only; the precomputed
//! values in [`StatsRecord`](crate::StatsRecord) are never consulted or
//! cross-checked.
//!
//! NaN samples are skipped (pairwise for the correlation). Aggregates over an
//! empty sample set are NaN rather than an error, and so is the standard
//! deviation of a single sample.

use crate::types::RunRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Speedup above which the optimized path counts as faster
pub const PARITY_THRESHOLD: f64 = 1.0;

/// Second, stricter speedup threshold reported alongside parity
pub const TARGET_THRESHOLD: f64 = 1.5;

/// Number of equal-width bins in the speedup histogram
pub const HISTOGRAM_BINS: usize = 30;

/// Whisker reach of the box plot, in multiples of the interquartile range
pub const WHISKER_IQR: f64 = 1.5;

/// Summary of a single sample column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Number of non-NaN samples
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// 25th percentile, linear interpolation
    pub q25: f64,
    /// 75th percentile, linear interpolation
    pub q75: f64,
}

impl ColumnSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let present = without_nan(values);
        let sorted = sorted(&present);

        Self {
            count: present.len(),
            mean: mean(&present),
            std_dev: sample_std_dev(&present),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            median: quantile_sorted(&sorted, 0.5),
            q25: quantile_sorted(&sorted, 0.25),
            q75: quantile_sorted(&sorted, 0.75),
        }
    }
}

/// Count and share of runs whose speedup is strictly above a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exceedance {
    pub threshold: f64,
    pub count: usize,
    /// Number of runs the share is taken over (NaN samples included)
    pub total: usize,
    /// `count / total`, NaN when there are no runs
    pub fraction: f64,
}

impl Exceedance {
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Everything the report derives from the run records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of run records the summary was computed from
    pub runs: usize,
    pub speedup: ColumnSummary,
    pub relative_error: ColumnSummary,
    /// Pearson correlation between speedup and relative error
    pub correlation: f64,
    /// Runs with speedup > [`PARITY_THRESHOLD`]
    pub above_parity: Exceedance,
    /// Runs with speedup > [`TARGET_THRESHOLD`]
    pub above_target: Exceedance,
}

impl RunSummary {
    pub fn from_runs(runs: &[RunRecord]) -> Self {
        let (speedups, errors) = columns(runs);

        let summary = Self {
            runs: runs.len(),
            speedup: ColumnSummary::from_values(&speedups),
            relative_error: ColumnSummary::from_values(&errors),
            correlation: pearson(&speedups, &errors),
            above_parity: exceedance(&speedups, PARITY_THRESHOLD),
            above_target: exceedance(&speedups, TARGET_THRESHOLD),
        };

        log::debug!(
            "Summarized {} runs: median speedup {:.4}, correlation {:.3}",
            summary.runs,
            summary.speedup.median,
            summary.correlation
        );
        summary
    }
}

/// Split run records into (speedup, relative_error) columns, preserving order
pub fn columns(runs: &[RunRecord]) -> (Vec<f64>, Vec<f64>) {
    runs.iter().map(|r| (r.speedup, r.relative_error)).unzip()
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; NaN for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Quantile with linear interpolation between closest ranks
///
/// `q` is clamped to `[0, 1]`. NaN values are ignored.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted(&without_nan(values)), q)
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Pearson correlation coefficient over pairs where both values are present
///
/// NaN when fewer than two complete pairs exist or either column is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// Count values strictly above `threshold`, as a share of all values
pub fn exceedance(values: &[f64], threshold: f64) -> Exceedance {
    let count = values.iter().filter(|v| **v > threshold).count();
    let total = values.len();
    let fraction = if total == 0 {
        f64::NAN
    } else {
        count as f64 / total as f64
    };

    Exceedance {
        threshold,
        count,
        total,
        fraction,
    }
}

/// Equal-width histogram over the finite samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Left edge of the first bin
    pub lower: f64,
    /// Right edge of the last bin
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range
    ///
    /// Every bin is half-open except the last, which also holds the maximum.
    /// A constant sample is spread over a unit-wide range centered on it.
    /// Returns `None` when there are no finite samples or `bins` is zero.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }

        let mut lower = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut upper = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0; bins];
        for v in finite {
            let index = (((v - lower) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        Some(Self {
            lower,
            upper,
            counts,
        })
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// `(left, right, count)` for every bin, in order
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let width = self.bin_width();
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let left = self.lower + width * i as f64;
            (left, left + width, count)
        })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Box-and-whisker summary of the finite samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest sample within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest sample within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    /// Samples beyond the whiskers, in input order
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns `None` when there are no finite samples
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let sorted = sorted(&finite);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let reach = WHISKER_IQR * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= q1 - reach)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= q3 + reach)
            .unwrap_or(q3);

        let outliers = finite
            .iter()
            .copied()
            .filter(|v| *v < lower_whisker || *v > upper_whisker)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

fn without_nan(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
