//! Report generation
//!
//! Produces the console text report, the four-panel chart image and the
//! optional JSON summary.

pub mod chart;
pub mod raster;
pub mod txt;

use crate::config::AppConfig;
use plotters::drawing::DrawingAreaErrorKind;
use serde::Serialize;
use speedup_stats::{Dataset, RunSummary};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while producing the chart image
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Backend(String),

    #[error("Failed to rasterize chart: {0}")]
    Rasterize(String),

    #[error("Invalid canvas size: {width}x{height} pixels")]
    Canvas { width: u32, height: u32 },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(e.to_string())
    }
}

/// Draw the chart and write it to `config.output.image`
///
/// A `.svg` output path gets the vector document as drawn; anything else is
/// rasterized at the configured DPI and encoded as PNG.
pub fn render_chart(dataset: &Dataset, summary: &RunSummary, config: &AppConfig) -> Result<PathBuf, RenderError> {
    let output = &config.output;
    let path = output.image.clone();

    let layout = (
        (output.width_in * chart::LAYOUT_DPI).round() as u32,
        (output.height_in * chart::LAYOUT_DPI).round() as u32,
    );
    log::info!("Rendering chart ({}x{} in @ {} dpi)", output.width_in, output.height_in, output.dpi);
    let svg = chart::render_svg(dataset, summary, &config.chart.title, layout)?;

    if is_svg(&path) {
        fs::write(&path, svg).map_err(|e| RenderError::Write {
            path: path.clone(),
            source: e,
        })?;
    } else {
        let image = raster::rasterize(&svg, config.pixel_size(), &config.chart.font_dirs)?;
        raster::write_png(&image, &path)?;
    }

    log::info!("Chart written to {:?}", path);
    Ok(path)
}

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    /// Values as read from the stats file
    recorded: &'a BTreeMap<String, f64>,
    /// Values derived from the run rows
    derived: &'a RunSummary,
}

/// Write recorded and derived statistics as pretty-printed JSON
pub fn write_summary_json(dataset: &Dataset, summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    let document = SummaryDocument {
        recorded: dataset.stats().metrics(),
        derived: summary,
    };
    let json = serde_json::to_string_pretty(&document).context("Failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write summary: {:?}", path))?;

    log::info!("Summary written to {:?}", path);
    Ok(())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_svg() {
        assert!(is_svg(Path::new("chart.svg")));
        assert!(is_svg(Path::new("out/Chart.SVG")));
        assert!(!is_svg(Path::new("speedup_analysis.png")));
        assert!(!is_svg(Path::new("svg")));
    }
}
