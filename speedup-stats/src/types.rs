//! Core types for the speedup statistics library
//!
//! This module defines the records read from the benchmark output files and the
//! error type returned when they cannot be loaded. Records are plain data: once
//! loaded they are never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, DataLoadError>;

/// Metric names that must be present in the stats file
pub const REQUIRED_METRICS: [&str; 7] = [
    "avg_speedup",
    "min_speedup",
    "max_speedup",
    "avg_error",
    "min_error",
    "max_error",
    "num_runs",
];

/// One benchmark trial, as written to `speedup_results.csv`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// 1-based trial number (chronological order)
    pub run: u64,
    /// Baseline time divided by optimized time
    pub speedup: f64,
    /// Fractional deviation of the optimized result from the baseline result
    pub relative_error: f64,
}

impl RunRecord {
    pub fn new(run: u64, speedup: f64, relative_error: f64) -> Self {
        Self {
            run,
            speedup,
            relative_error,
        }
    }
}

/// Precomputed summary values, as written to `speedup_stats.csv`
///
/// Metrics are kept by name. The seven values the report needs are checked for
/// at load time and exposed through typed accessors; any additional metrics
/// are retained but otherwise ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRecord {
    metrics: BTreeMap<String, f64>,
    num_runs: u64,
}

impl StatsRecord {
    /// Build a stats record from a metric map, checking required metrics
    pub fn from_metrics(metrics: BTreeMap<String, f64>) -> std::result::Result<Self, MetricError> {
        for name in REQUIRED_METRICS {
            if !metrics.contains_key(name) {
                return Err(MetricError::Missing(name.to_string()));
            }
        }

        let raw_runs = metrics["num_runs"];
        if !raw_runs.is_finite() || raw_runs < 0.0 {
            return Err(MetricError::InvalidRunCount(raw_runs));
        }

        Ok(Self {
            // Truncates fractional counts the same way an integer cast does
            num_runs: raw_runs.trunc() as u64,
            metrics,
        })
    }

    /// Look up any metric by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// All loaded metrics, sorted by name
    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }

    pub fn avg_speedup(&self) -> f64 {
        self.metrics["avg_speedup"]
    }

    pub fn min_speedup(&self) -> f64 {
        self.metrics["min_speedup"]
    }

    pub fn max_speedup(&self) -> f64 {
        self.metrics["max_speedup"]
    }

    pub fn avg_error(&self) -> f64 {
        self.metrics["avg_error"]
    }

    pub fn min_error(&self) -> f64 {
        self.metrics["min_error"]
    }

    pub fn max_error(&self) -> f64 {
        self.metrics["max_error"]
    }

    /// Run count as recorded by the benchmark (not checked against the runs file)
    pub fn num_runs(&self) -> u64 {
        self.num_runs
    }
}

/// Problems with the metric set of a stats file
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("required metric '{0}' is missing")]
    Missing(String),

    #[error("num_runs must be a non-negative number, got {0}")]
    InvalidRunCount(f64),
}

/// Errors that can occur while loading the input tables
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("Failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid stats in {path:?}: {source}")]
    InvalidMetric {
        path: PathBuf,
        #[source]
        source: MetricError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_metrics() -> BTreeMap<String, f64> {
        [
            ("avg_speedup", 1.24),
            ("min_speedup", 0.9),
            ("max_speedup", 2.0),
            ("avg_error", 0.024),
            ("min_error", 0.01),
            ("max_error", 0.05),
            ("num_runs", 5.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_stats_record_accessors() {
        let stats = StatsRecord::from_metrics(reference_metrics()).unwrap();
        assert_eq!(stats.avg_speedup(), 1.24);
        assert_eq!(stats.max_error(), 0.05);
        assert_eq!(stats.num_runs(), 5);
        assert_eq!(stats.get("no_such_metric"), None);
    }

    #[test]
    fn test_extra_metrics_are_kept() {
        let mut metrics = reference_metrics();
        metrics.insert("median_speedup".to_string(), 1.1);
        let stats = StatsRecord::from_metrics(metrics).unwrap();
        assert_eq!(stats.get("median_speedup"), Some(1.1));
        assert_eq!(stats.metrics().len(), 8);
    }

    #[test]
    fn test_missing_metric_rejected() {
        let mut metrics = reference_metrics();
        metrics.remove("min_error");
        let err = StatsRecord::from_metrics(metrics).unwrap_err();
        assert_eq!(err, MetricError::Missing("min_error".to_string()));
    }

    #[test]
    fn test_run_count_truncated_and_validated() {
        let mut metrics = reference_metrics();
        metrics.insert("num_runs".to_string(), 7.9);
        assert_eq!(StatsRecord::from_metrics(metrics.clone()).unwrap().num_runs(), 7);

        metrics.insert("num_runs".to_string(), -1.0);
        assert!(matches!(
            StatsRecord::from_metrics(metrics),
            Err(MetricError::InvalidRunCount(_))
        ));
    }
}
