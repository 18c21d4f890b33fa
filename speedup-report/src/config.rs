//! Configuration loading and parsing
//!
//! Every setting has a default matching the fixed file names the benchmark
//! writes, so running without a config file reproduces the standard report.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RESULTS_FILE: &str = "speedup_results.csv";
pub const DEFAULT_STATS_FILE: &str = "speedup_stats.csv";
pub const DEFAULT_IMAGE_FILE: &str = "speedup_analysis.png";
pub const DEFAULT_TITLE: &str =
    "HybridVector vs Regular Vector: Performance and Accuracy Analysis";

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    #[serde(default = "default_results")]
    pub results: PathBuf,
    #[serde(default = "default_stats")]
    pub stats: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Chart image; a `.svg` extension skips rasterization
    #[serde(default = "default_image")]
    pub image: PathBuf,
    /// Optional JSON dump of the derived statistics
    pub summary_json: Option<PathBuf>,
    #[serde(default = "default_width_in")]
    pub width_in: f64,
    #[serde(default = "default_height_in")]
    pub height_in: f64,
    #[serde(default = "default_dpi")]
    pub dpi: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Extra directories searched for fonts when rasterizing
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
}

fn default_results() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_FILE)
}

fn default_stats() -> PathBuf {
    PathBuf::from(DEFAULT_STATS_FILE)
}

fn default_image() -> PathBuf {
    PathBuf::from(DEFAULT_IMAGE_FILE)
}

fn default_width_in() -> f64 {
    14.0
}

fn default_height_in() -> f64 {
    10.0
}

fn default_dpi() -> f64 {
    300.0
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            results: default_results(),
            stats: default_stats(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            summary_json: None,
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            font_dirs: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Check values that would otherwise only fail at render time
    pub fn validate(&self) -> Result<()> {
        let output = &self.output;
        for (name, value) in [
            ("output.width_in", output.width_in),
            ("output.height_in", output.height_in),
            ("output.dpi", output.dpi),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        Ok(())
    }

    /// Output size in pixels at the configured DPI
    pub fn pixel_size(&self) -> (u32, u32) {
        let output = &self.output;
        (
            (output.width_in * output.dpi).round() as u32,
            (output.height_in * output.dpi).round() as u32,
        )
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            results = "runs/results.csv"

            [output]
            image = "report.svg"
            dpi = 150

            [chart]
            title = "Nightly benchmark"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.results, PathBuf::from("runs/results.csv"));
        assert_eq!(config.input.stats, PathBuf::from(DEFAULT_STATS_FILE));
        assert_eq!(config.output.image, PathBuf::from("report.svg"));
        assert_eq!(config.output.dpi, 150.0);
        assert_eq!(config.output.width_in, 14.0);
        assert_eq!(config.chart.title, "Nightly benchmark");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pixel_size(), (4200, 3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[output]\nbins = 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_non_positive_dpi() {
        let mut config = AppConfig::default();
        config.output.dpi = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.dpi"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        fs::write(&path, "[output]\nheight_in = -1\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("output.height_in"));
    }
}
