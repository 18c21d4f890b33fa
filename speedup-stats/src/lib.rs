//! Speedup Statistics Library
//!
//! Loads the two CSV files written by the vector-distance benchmark and derives
//! descriptive statistics from them.
//!
//! # Architecture
//!
//! This library only reads and computes:
//! - Parses `speedup_results.csv` (one row per run) and `speedup_stats.csv`
//!   (`metric,value` pairs)
//! - Computes mean, sample standard deviation, median, linear quantiles,
//!   threshold exceedance and Pearson correlation
//! - Bins histograms and computes box-plot whiskers for charting
//!
//! The library does NOT:
//! - Print reports
//! - Draw or encode charts
//! - Cross-validate the stats file against the run rows
//!
//! Presentation lives in the application layer (speedup-report).
//!
//! # Example Usage
//!
//! ```no_run
//! use speedup_stats::{Dataset, Histogram, HISTOGRAM_BINS};
//! use std::path::Path;
//!
//! let dataset = Dataset::load(
//!     Path::new("speedup_results.csv"),
//!     Path::new("speedup_stats.csv"),
//! ).unwrap();
//!
//! let summary = dataset.summarize();
//! println!("Runs > 1.0x: {}/{}", summary.above_parity.count, dataset.stats().num_runs());
//!
//! let speedups: Vec<f64> = dataset.runs().iter().map(|r| r.speedup).collect();
//! let histogram = Histogram::from_values(&speedups, HISTOGRAM_BINS);
//! ```

// Public modules
pub mod dataset;
pub mod loader;
pub mod summary;
pub mod types;

// Re-export main types for convenience
pub use dataset::Dataset;
pub use summary::{
    BoxStats, ColumnSummary, Exceedance, Histogram, RunSummary, HISTOGRAM_BINS,
    PARITY_THRESHOLD, TARGET_THRESHOLD,
};
pub use types::{DataLoadError, MetricError, Result, RunRecord, StatsRecord, REQUIRED_METRICS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty dataset summarizes without panicking
        let summary = RunSummary::from_runs(&[]);
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.above_parity.count, 0);
        assert!(summary.speedup.std_dev.is_nan());
    }
}
