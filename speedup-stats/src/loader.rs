//! CSV loaders for the benchmark output files
//!
//! Both files are comma-separated with a header row. Columns are matched by
//! header name, so column order does not matter and extra columns are ignored.
//! A missing column is reported by name before any row is parsed.

use crate::types::{DataLoadError, Result, RunRecord, StatsRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns of the per-run results file
pub const RUN_COLUMNS: [&str; 3] = ["run", "speedup", "relative_error"];

/// Columns of the summary stats file
pub const STATS_COLUMNS: [&str; 2] = ["metric", "value"];

#[derive(Debug, Deserialize)]
struct MetricRow {
    metric: String,
    value: f64,
}

/// Load the per-run results file (`run,speedup,relative_error`)
pub fn load_runs(path: &Path) -> Result<Vec<RunRecord>> {
    log::info!("Loading run results: {:?}", path);
    let file = open(path)?;
    let runs = read_runs(file, path)?;
    log::info!("Loaded {} runs from {:?}", runs.len(), path);
    Ok(runs)
}

/// Load the summary stats file (`metric,value`)
pub fn load_stats(path: &Path) -> Result<StatsRecord> {
    log::info!("Loading summary stats: {:?}", path);
    let file = open(path)?;
    let stats = read_stats(file, path)?;
    log::debug!("Loaded {} metrics from {:?}", stats.metrics().len(), path);
    Ok(stats)
}

/// Parse run records from any reader; `source` is only used in error messages
pub fn read_runs<R: Read>(reader: R, source: &Path) -> Result<Vec<RunRecord>> {
    let mut csv_reader = build_reader(reader);
    check_columns(&mut csv_reader, &RUN_COLUMNS, source)?;

    csv_reader
        .deserialize::<RunRecord>()
        .map(|row| row.map_err(|e| csv_error(source, e)))
        .collect()
}

/// Parse a stats record from any reader; `source` is only used in error messages
///
/// When a metric appears more than once the last value wins.
pub fn read_stats<R: Read>(reader: R, source: &Path) -> Result<StatsRecord> {
    let mut csv_reader = build_reader(reader);
    check_columns(&mut csv_reader, &STATS_COLUMNS, source)?;

    let mut metrics = BTreeMap::new();
    for row in csv_reader.deserialize::<MetricRow>() {
        let row = row.map_err(|e| csv_error(source, e))?;
        if let Some(previous) = metrics.insert(row.metric.clone(), row.value) {
            log::warn!(
                "Metric '{}' repeated in {:?} ({} replaced by {})",
                row.metric,
                source,
                previous,
                row.value
            );
        }
    }

    StatsRecord::from_metrics(metrics).map_err(|e| DataLoadError::InvalidMetric {
        path: source.to_path_buf(),
        source: e,
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| DataLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn build_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn check_columns<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    expected: &[&str],
    source: &Path,
) -> Result<()> {
    let headers = csv_reader.headers().map_err(|e| csv_error(source, e))?;

    for column in expected {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                path: source.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn csv_error(source: &Path, e: csv::Error) -> DataLoadError {
    DataLoadError::Csv {
        path: source.to_path_buf(),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricError;

    const STATS_CSV: &str = "metric,value\n\
        avg_speedup,1.24\n\
        min_speedup,0.9\n\
        max_speedup,2\n\
        avg_error,0.024\n\
        min_error,0.01\n\
        max_error,0.05\n\
        num_runs,5\n";

    #[test]
    fn test_read_runs() {
        let input = "run,speedup,relative_error\n1,0.9,0.01\n2,1.5,2.5e-07\n";
        let runs = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], RunRecord::new(1, 0.9, 0.01));
        assert_eq!(runs[1].relative_error, 2.5e-7);
    }

    #[test]
    fn test_read_runs_any_column_order() {
        let input = "relative_error,note,run,speedup\n0.02,warm,1,1.25\n";
        let runs = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap();
        assert_eq!(runs, vec![RunRecord::new(1, 1.25, 0.02)]);
    }

    #[test]
    fn test_read_runs_accepts_non_finite_values() {
        let input = "run,speedup,relative_error\n1,inf,nan\n";
        let runs = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap();
        assert!(runs[0].speedup.is_infinite());
        assert!(runs[0].relative_error.is_nan());
    }

    #[test]
    fn test_read_runs_missing_column() {
        let input = "run,speedup\n1,1.0\n";
        let err = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap_err();
        match err {
            DataLoadError::MissingColumn { column, .. } => assert_eq!(column, "relative_error"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_runs_bad_value() {
        let input = "run,speedup,relative_error\n1,fast,0.01\n";
        let err = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { .. }));
    }

    #[test]
    fn test_read_runs_header_only() {
        let input = "run,speedup,relative_error\n";
        let runs = read_runs(input.as_bytes(), Path::new("runs.csv")).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn test_read_stats() {
        let stats = read_stats(STATS_CSV.as_bytes(), Path::new("stats.csv")).unwrap();
        assert_eq!(stats.avg_speedup(), 1.24);
        assert_eq!(stats.max_speedup(), 2.0);
        assert_eq!(stats.num_runs(), 5);
    }

    #[test]
    fn test_read_stats_last_duplicate_wins() {
        let input = format!("{STATS_CSV}avg_speedup,1.5\n");
        let stats = read_stats(input.as_bytes(), Path::new("stats.csv")).unwrap();
        assert_eq!(stats.avg_speedup(), 1.5);
    }

    #[test]
    fn test_read_stats_missing_metric() {
        let input = STATS_CSV.replace("num_runs,5\n", "");
        let err = read_stats(input.as_bytes(), Path::new("stats.csv")).unwrap_err();
        match err {
            DataLoadError::InvalidMetric { source, .. } => {
                assert_eq!(source, MetricError::Missing("num_runs".to_string()))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_stats_misnamed_column() {
        let input = STATS_CSV.replace("metric,value", "name,value");
        let err = read_stats(input.as_bytes(), Path::new("stats.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "metric"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_runs(Path::new("/nonexistent/speedup_results.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
        assert!(err.to_string().contains("speedup_results.csv"));
    }
}
