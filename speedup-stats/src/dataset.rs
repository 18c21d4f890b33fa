//! Main dataset API
//!
//! A [`Dataset`] holds both benchmark output files once loaded. It is the
//! entry point the report binary uses: load once, then derive summaries.

use crate::loader;
use crate::summary::RunSummary;
use crate::types::{Result, RunRecord, StatsRecord};
use std::path::Path;

/// Run records plus the precomputed stats written next to them
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    runs: Vec<RunRecord>,
    stats: StatsRecord,
}

impl Dataset {
    pub fn new(runs: Vec<RunRecord>, stats: StatsRecord) -> Self {
        Self { runs, stats }
    }

    /// Load the results and stats files
    ///
    /// Both files are read before anything is returned; a failure in either
    /// one fails the whole load.
    ///
    /// # Example
    /// ```no_run
    /// use speedup_stats::Dataset;
    /// use std::path::Path;
    ///
    /// let dataset = Dataset::load(
    ///     Path::new("speedup_results.csv"),
    ///     Path::new("speedup_stats.csv"),
    /// ).unwrap();
    /// println!("median speedup: {}", dataset.summarize().speedup.median);
    /// ```
    pub fn load(results_path: &Path, stats_path: &Path) -> Result<Self> {
        let runs = loader::load_runs(results_path)?;
        let stats = loader::load_stats(stats_path)?;

        let dataset = Self::new(runs, stats);
        if !dataset.run_count_matches() {
            log::debug!(
                "Stats file records {} runs but {} run rows were loaded",
                dataset.stats.num_runs(),
                dataset.runs.len()
            );
        }
        Ok(dataset)
    }

    /// Run records in trial order
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn stats(&self) -> &StatsRecord {
        &self.stats
    }

    /// Derive descriptive statistics from the run records
    pub fn summarize(&self) -> RunSummary {
        RunSummary::from_runs(&self.runs)
    }

    /// Whether the recorded `num_runs` agrees with the loaded row count
    ///
    /// Informational only: nothing else in the crate depends on it.
    pub fn run_count_matches(&self) -> bool {
        self.stats.num_runs() == self.runs.len() as u64
    }
}
