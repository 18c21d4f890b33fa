//! Four-panel chart drawing
//!
//! The figure is drawn as SVG at [`LAYOUT_DPI`] and later rasterized at the
//! output DPI, so font sizes and margins below are in layout pixels.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────┐
//! │ A: speedup over time     │ B: speedup histogram     │
//! ├──────────────────────────┼──────────────────────────┤
//! │ C: box plot + stats box  │ D: speedup vs error      │
//! └──────────────────────────┴──────────────────────────┘
//! ```

use super::txt::fixed;
use super::RenderError;
use plotters::chart::{ChartContext, SeriesLabelPosition};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use speedup_stats::{BoxStats, Dataset, Histogram, RunSummary, HISTOGRAM_BINS, PARITY_THRESHOLD};
use std::ops::Range;

/// Pixels per inch of the SVG layout
pub const LAYOUT_DPI: f64 = 100.0;

const FONT: &str = "sans-serif";
const TITLE_SIZE: i32 = 26;
const CAPTION_SIZE: i32 = 19;
const LABEL_SIZE: i32 = 13;
const NOTE_SIZE: i32 = 12;
const NOTE_LINE_HEIGHT: i32 = 16;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const WHEAT: RGBColor = RGBColor(245, 222, 179);
const MEDIAN_ORANGE: RGBColor = RGBColor(255, 127, 14);

// Viridis anchor colors at 0, 0.25, 0.5, 0.75 and 1
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draw the full figure and return the SVG document
///
/// `size` is the canvas in layout pixels.
pub fn render_svg(
    dataset: &Dataset,
    summary: &RunSummary,
    title: &str,
    size: (u32, u32),
) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let body = root.titled(title, (FONT, TITLE_SIZE).into_font())?;
        let panels = body.split_evenly((2, 2));

        log::debug!("Drawing panel A (time series)");
        draw_time_series(&panels[0], dataset)?;
        log::debug!("Drawing panel B (histogram)");
        draw_histogram(&panels[1], dataset)?;
        log::debug!("Drawing panel C (box plot)");
        draw_box_summary(&panels[2], dataset, summary)?;
        log::debug!("Drawing panel D (speedup vs error)");
        draw_tradeoff(&panels[3], dataset, summary)?;

        root.present()?;
    }
    Ok(svg)
}

/// Panel A: speedup per run with average and parity lines
fn draw_time_series(area: &Panel<'_>, dataset: &Dataset) -> Result<(), RenderError> {
    let stats = dataset.stats();
    let points: Vec<(f64, f64)> = dataset
        .runs()
        .iter()
        .filter(|r| r.speedup.is_finite())
        .map(|r| (r.run as f64, r.speedup))
        .collect();

    let x_range = padded_range(points.iter().map(|p| p.0), 0.0);
    let y_range = padded_range(
        points
            .iter()
            .map(|p| p.1)
            .chain([stats.avg_speedup(), PARITY_THRESHOLD]),
        0.05,
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Speedup Over Time", (FONT, CAPTION_SIZE).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Run Number")
        .y_desc("Speedup (x)")
        .label_style((FONT, LABEL_SIZE).into_font())
        .light_line_style(BLACK.mix(0.03).stroke_width(1))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(points, BLUE.mix(0.7).stroke_width(1)))?;

    let average = RED.stroke_width(2);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, stats.avg_speedup()), (x_range.end, stats.avg_speedup())],
            average,
        )))?
        .label(format!("Average: {}x", fixed(stats.avg_speedup(), 3)))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], average));

    let parity = BLACK.mix(0.5).stroke_width(1);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, PARITY_THRESHOLD), (x_range.end, PARITY_THRESHOLD)],
            parity,
        )))?
        .label("No speedup (1.0x)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], parity));

    draw_legend(&mut chart)
}

/// Panel B: speedup histogram with average and parity lines
fn draw_histogram(area: &Panel<'_>, dataset: &Dataset) -> Result<(), RenderError> {
    let stats = dataset.stats();
    let speedups: Vec<f64> = dataset.runs().iter().map(|r| r.speedup).collect();
    let histogram = Histogram::from_values(&speedups, HISTOGRAM_BINS);

    let (edges, max_count) = match &histogram {
        Some(h) => (vec![h.lower, h.upper], h.max_count()),
        None => (Vec::new(), 0),
    };
    let x_range = padded_range(
        edges.into_iter().chain([stats.avg_speedup(), PARITY_THRESHOLD]),
        0.05,
    );
    let y_range = 0.0..(max_count.max(1) as f64 * 1.05);

    let mut chart = ChartBuilder::on(area)
        .caption("Speedup Distribution", (FONT, CAPTION_SIZE).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Speedup (x)")
        .y_desc("Frequency")
        .label_style((FONT, LABEL_SIZE).into_font())
        .light_line_style(BLACK.mix(0.03).stroke_width(1))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .x_label_formatter(&|v| format!("{:.2}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    if let Some(histogram) = &histogram {
        chart.draw_series(histogram.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], SKY_BLUE.mix(0.7).filled())
        }))?;
        chart.draw_series(
            histogram
                .bins()
                .filter(|(_, _, count)| *count > 0)
                .map(|(left, right, count)| {
                    Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
                }),
        )?;
    }

    let average = RED.stroke_width(2);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(stats.avg_speedup(), y_range.start), (stats.avg_speedup(), y_range.end)],
            average,
        )))?
        .label(format!("Average: {}x", fixed(stats.avg_speedup(), 3)))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], average));

    let parity = BLACK.mix(0.5).stroke_width(1);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(PARITY_THRESHOLD, y_range.start), (PARITY_THRESHOLD, y_range.end)],
            parity,
        )))?
        .label("No speedup (1.0x)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], parity));

    draw_legend(&mut chart)
}

/// Panel C: box-and-whisker of speedup, with a statistics box on the right
fn draw_box_summary(
    area: &Panel<'_>,
    dataset: &Dataset,
    summary: &RunSummary,
) -> Result<(), RenderError> {
    let speedups: Vec<f64> = dataset.runs().iter().map(|r| r.speedup).collect();
    let box_stats = BoxStats::from_values(&speedups);

    let (width, _) = area.dim_in_pixel();
    let (plot_area, note_area) = area.split_horizontally((width as f64 * 0.62) as i32);

    let mut extents = vec![PARITY_THRESHOLD];
    if let Some(b) = &box_stats {
        extents.extend([b.lower_whisker, b.upper_whisker]);
        extents.extend(b.outliers.iter().copied());
    }
    let x_range = 0.5..1.5;
    let y_range = padded_range(extents.into_iter(), 0.05);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption("Speedup Distribution Summary", (FONT, CAPTION_SIZE).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Speedup")
        .y_desc("Speedup (x)")
        .label_style((FONT, LABEL_SIZE).into_font())
        .light_line_style(BLACK.mix(0.03).stroke_width(1))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_range.start, PARITY_THRESHOLD), (x_range.end, PARITY_THRESHOLD)],
        BLACK.mix(0.5).stroke_width(1),
    )))?;

    if let Some(b) = &box_stats {
        let (left, right, center) = (0.85, 1.15, 1.0);
        let (cap_left, cap_right) = (0.925, 1.075);
        let outline = BLACK.stroke_width(1);

        chart.draw_series([
            Rectangle::new([(left, b.q1), (right, b.q3)], LIGHT_BLUE.filled()),
            Rectangle::new([(left, b.q1), (right, b.q3)], outline),
        ])?;
        chart.draw_series([
            PathElement::new(vec![(center, b.q1), (center, b.lower_whisker)], outline),
            PathElement::new(vec![(center, b.q3), (center, b.upper_whisker)], outline),
            PathElement::new(vec![(cap_left, b.lower_whisker), (cap_right, b.lower_whisker)], outline),
            PathElement::new(vec![(cap_left, b.upper_whisker), (cap_right, b.upper_whisker)], outline),
            PathElement::new(vec![(left, b.median), (right, b.median)], MEDIAN_ORANGE.stroke_width(2)),
        ])?;
        chart.draw_series(
            b.outliers
                .iter()
                .map(|v| Circle::new((center, *v), 3, BLACK.stroke_width(1))),
        )?;
    }

    let stats = dataset.stats();
    let speedup = &summary.speedup;
    let error = &summary.relative_error;
    let lines = vec![
        "SPEEDUP STATS:".to_string(),
        format!("Mean: {}x", fixed(stats.avg_speedup(), 3)),
        format!("Median: {}x", fixed(speedup.median, 3)),
        format!("Std: {}", fixed(speedup.std_dev, 3)),
        format!("Min: {}x", fixed(stats.min_speedup(), 3)),
        format!("Max: {}x", fixed(stats.max_speedup(), 3)),
        String::new(),
        "ERROR STATS:".to_string(),
        format!("Mean: {}%", fixed(stats.avg_error() * 100.0, 4)),
        format!("Median: {}%", fixed(error.median * 100.0, 4)),
        format!("Std: {}%", fixed(error.std_dev * 100.0, 4)),
        format!("Min: {}%", fixed(stats.min_error() * 100.0, 4)),
        format!("Max: {}%", fixed(stats.max_error() * 100.0, 4)),
    ];
    draw_note(&note_area, (8, 40), &lines, WHEAT)
}

/// Panel D: speedup against relative error, colored by run order
fn draw_tradeoff(
    area: &Panel<'_>,
    dataset: &Dataset,
    summary: &RunSummary,
) -> Result<(), RenderError> {
    let stats = dataset.stats();
    let avg_error_pct = stats.avg_error() * 100.0;
    let runs = dataset.runs();
    let last_index = runs.len().saturating_sub(1).max(1) as f64;

    let points: Vec<(f64, f64, RGBColor)> = runs
        .iter()
        .enumerate()
        .map(|(i, r)| (r.speedup, r.relative_error * 100.0, viridis(i as f64 / last_index)))
        .filter(|(x, y, _)| x.is_finite() && y.is_finite())
        .collect();

    let x_range = padded_range(points.iter().map(|p| p.0).chain([PARITY_THRESHOLD]), 0.05);
    let y_range = padded_range(points.iter().map(|p| p.1).chain([avg_error_pct]), 0.05);

    let mut chart = ChartBuilder::on(area)
        .caption("Speedup vs Accuracy Trade-off", (FONT, CAPTION_SIZE).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Speedup (x)")
        .y_desc("Relative Error (%)")
        .label_style((FONT, LABEL_SIZE).into_font())
        .light_line_style(BLACK.mix(0.03).stroke_width(1))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .x_label_formatter(&|v| format!("{:.2}", v))
        .y_label_formatter(&|v| format!("{:.4}", v))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|(x, y, color)| Circle::new((*x, *y), 3, color.mix(0.6).filled())),
    )?;

    let parity = BLACK.mix(0.5).stroke_width(1);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(PARITY_THRESHOLD, y_range.start), (PARITY_THRESHOLD, y_range.end)],
            parity,
        )))?
        .label("No speedup (1.0x)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], parity));

    let average = RED.mix(0.7).stroke_width(2);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, avg_error_pct), (x_range.end, avg_error_pct)],
            average,
        )))?
        .label(format!("Avg error: {}%", fixed(avg_error_pct, 4)))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], average));

    draw_legend(&mut chart)?;

    // Top-left corner of the plotting area, relative to this panel
    let (plot_x, plot_y) = chart.plotting_area().get_pixel_range();
    let (panel_x, panel_y) = area.get_pixel_range();
    let origin = (plot_x.start - panel_x.start + 8, plot_y.start - panel_y.start + 8);

    let parity_runs = &summary.above_parity;
    let lines = vec![
        format!("Correlation: {}", fixed(summary.correlation, 3)),
        format!(
            "Runs > 1.0x: {}/{} ({}%)",
            parity_runs.count,
            stats.num_runs(),
            fixed(parity_runs.percent(), 1)
        ),
    ];
    draw_note(area, origin, &lines, LIGHT_BLUE)
}

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> Result<(), RenderError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.mix(0.3).stroke_width(1))
        .label_font((FONT, LABEL_SIZE).into_font())
        .draw()?;
    Ok(())
}

/// Rounded-looking annotation box with one text line per entry
fn draw_note(
    area: &Panel<'_>,
    origin: (i32, i32),
    lines: &[String],
    fill: RGBColor,
) -> Result<(), RenderError> {
    const PADDING: i32 = 8;

    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let width = longest * NOTE_SIZE * 6 / 10 + 2 * PADDING;
    let height = lines.len() as i32 * NOTE_LINE_HEIGHT + 2 * PADDING;
    let corner = (origin.0 + width, origin.1 + height);

    area.draw(&Rectangle::new([origin, corner], fill.mix(0.9).filled()))?;
    area.draw(&Rectangle::new([origin, corner], BLACK.mix(0.4).stroke_width(1)))?;

    for (i, line) in lines.iter().enumerate() {
        let position = (
            origin.0 + PADDING,
            origin.1 + PADDING + i as i32 * NOTE_LINE_HEIGHT,
        );
        area.draw(&Text::new(line.clone(), position, (FONT, NOTE_SIZE).into_font()))?;
    }
    Ok(())
}

/// Finite range covering `values`, widened by `margin` of its span on each side
///
/// Degenerate inputs still give a drawable range: no finite values map to
/// `0..1` and a single value to a unit-wide range around it.
fn padded_range(values: impl Iterator<Item = f64>, margin: f64) -> Range<f64> {
    let (low, high) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if low > high {
        return 0.0..1.0;
    }
    if low == high {
        return (low - 0.5)..(high + 0.5);
    }
    let pad = (high - low) * margin;
    (low - pad)..(high + pad)
}

/// Viridis color ramp, `t` in `[0, 1]`
fn viridis(t: f64) -> RGBColor {
    let scaled = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - index as f64;

    let (r0, g0, b0) = VIRIDIS[index];
    let (r1, g1, b1) = VIRIDIS[index + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
