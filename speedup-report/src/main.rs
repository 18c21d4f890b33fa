//! Speedup Report CLI Application
//!
//! This is the command-line front end for the speedup-stats library.
//! It loads the benchmark output files and adds:
//! - Console text report (recorded and derived statistics)
//! - Four-panel chart image (PNG, or SVG by extension)
//! - Optional JSON summary
//! - TOML configuration with command-line overrides

use anyhow::{Context, Result};
use clap::Parser;
use speedup_stats::Dataset;
use std::io::{self, Write};
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;

/// Speedup Report - Summarize and chart benchmark speedup results
#[derive(Parser, Debug)]
#[command(name = "speedup-report")]
#[command(about = "Summarize and chart benchmark speedup/accuracy results", long_about = None)]
#[command(version)]
struct Args {
    /// Per-run results CSV (default: speedup_results.csv)
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Summary stats CSV (default: speedup_stats.csv)
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,

    /// Chart image to write (default: speedup_analysis.png)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write recorded and derived statistics as JSON
    #[arg(long, value_name = "FILE")]
    summary_json: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Speedup Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using statistics library v{}", speedup_stats::VERSION);

    let config = resolve_config(&args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&config, &mut out)
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(results) = &args.results {
        config.input.results = results.clone();
    }
    if let Some(stats) = &args.stats {
        config.input.stats = stats.clone();
    }
    if let Some(output) = &args.output {
        config.output.image = output.clone();
    }
    if let Some(summary_json) = &args.summary_json {
        config.output.summary_json = Some(summary_json.clone());
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Load, summarize, print, render - in that order, stopping at the first failure
fn run<W: Write>(config: &AppConfig, out: &mut W) -> Result<()> {
    let dataset = Dataset::load(&config.input.results, &config.input.stats)
        .context("Failed to load benchmark data")?;

    let summary = dataset.summarize();

    report::txt::write_report(out, dataset.stats(), &summary)?;
    out.flush()?;

    let path = report::render_chart(&dataset, &summary, config).context("Failed to render chart")?;
    writeln!(out, "Plot saved as {}", path.display())?;

    if let Some(json_path) = &config.output.summary_json {
        report::write_summary_json(&dataset, &summary, json_path)?;
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const RESULTS_CSV: &str = "run,speedup,relative_error
1,0.9,0.01
2,1.0,0.02
3,1.1,0.01
4,1.2,0.03
5,2.0,0.05
";

    const STATS_CSV: &str = "metric,value
avg_speedup,1.24
min_speedup,0.9
max_speedup,2.0
avg_error,0.024
min_error,0.01
max_error,0.05
num_runs,5
";

    fn config_in(dir: &Path, image: &str) -> AppConfig {
        fs::write(dir.join("speedup_results.csv"), RESULTS_CSV).unwrap();
        fs::write(dir.join("speedup_stats.csv"), STATS_CSV).unwrap();

        let mut config = AppConfig::default();
        config.input.results = dir.join("speedup_results.csv");
        config.input.stats = dir.join("speedup_stats.csv");
        config.output.image = dir.join(image);
        config
    }

    #[test]
    fn test_end_to_end_png() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "speedup_analysis.png");

        let mut out = Vec::new();
        run(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Median speedup: 1.1000x"));
        assert!(text.contains("Runs with speedup > 1.0x: 3/5 (60.0%)"));
        assert!(text.ends_with(&format!("Plot saved as {}\n", config.output.image.display())));

        let dimensions = image::image_dimensions(&config.output.image).unwrap();
        assert_eq!(dimensions, (4200, 3000));
    }

    #[test]
    fn test_end_to_end_svg_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "chart.svg");
        config.output.summary_json = Some(dir.path().join("summary.json"));

        run(&config, &mut Vec::new()).unwrap();

        let svg = fs::read_to_string(&config.output.image).unwrap();
        assert!(svg.contains("Speedup vs Accuracy Trade-off"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
        assert_eq!(json["recorded"]["num_runs"], 5.0);
        assert_eq!(json["derived"]["above_parity"]["count"], 3);
    }

    #[test]
    fn test_load_failure_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "speedup_analysis.png");
        config.input.stats = dir.path().join("missing.csv");

        let mut out = Vec::new();
        let err = run(&config, &mut out).unwrap_err();
        assert!(out.is_empty());
        assert!(format!("{:#}", err).contains("missing.csv"));
        assert!(!config.output.image.exists());
    }

    #[test]
    fn test_unwritable_output_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "no/such/dir/chart.png");

        let err = run(&config, &mut Vec::new()).unwrap_err();
        assert!(err.downcast_ref::<report::RenderError>().is_some());
    }

    #[test]
    fn test_command_line_overrides_config() {
        let args = Args::parse_from([
            "speedup-report",
            "--results",
            "a.csv",
            "--output",
            "chart.svg",
            "--summary-json",
            "s.json",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input.results, PathBuf::from("a.csv"));
        assert_eq!(config.input.stats, PathBuf::from(config::DEFAULT_STATS_FILE));
        assert_eq!(config.output.image, PathBuf::from("chart.svg"));
        assert_eq!(config.output.summary_json, Some(PathBuf::from("s.json")));
    }
}
