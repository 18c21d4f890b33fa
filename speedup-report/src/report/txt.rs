//! Console text report
//!
//! Recorded values from the stats file come first, then the statistics derived
//! from the run rows. Exceedance lines divide by the recorded `num_runs`, while
//! the percentage is taken over the loaded rows; the two are not reconciled.

use speedup_stats::{Exceedance, RunSummary, StatsRecord};
use std::io::{self, Write};

/// Write the full text report
pub fn write_report<W: Write>(out: &mut W, stats: &StatsRecord, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "Statistics from {} runs:", stats.num_runs())?;
    writeln!(out, "Average speedup: {}x", fixed(stats.avg_speedup(), 4))?;
    writeln!(out, "Minimum speedup: {}x", fixed(stats.min_speedup(), 4))?;
    writeln!(out, "Maximum speedup: {}x", fixed(stats.max_speedup(), 4))?;
    writeln!(out, "Standard deviation speedup: {}", fixed(summary.speedup.std_dev, 4))?;
    writeln!(out, "Average relative error: {}", general(stats.avg_error()))?;
    writeln!(out, "Minimum relative error: {}", general(stats.min_error()))?;
    writeln!(out, "Maximum relative error: {}", general(stats.max_error()))?;
    writeln!(out, "Standard deviation error: {}", general(summary.relative_error.std_dev))?;

    writeln!(out)?;
    writeln!(out, "Additional Statistics:")?;
    writeln!(out, "Median speedup: {}x", fixed(summary.speedup.median, 4))?;
    writeln!(out, "25th percentile speedup: {}x", fixed(summary.speedup.q25, 4))?;
    writeln!(out, "75th percentile speedup: {}x", fixed(summary.speedup.q75, 4))?;
    write_exceedance(out, &summary.above_parity, stats.num_runs())?;
    write_exceedance(out, &summary.above_target, stats.num_runs())?;

    writeln!(out)?;
    writeln!(out, "Error Statistics:")?;
    writeln!(out, "Median relative error: {}%", fixed(summary.relative_error.median * 100.0, 6))?;
    writeln!(out, "25th percentile error: {}%", fixed(summary.relative_error.q25 * 100.0, 6))?;
    writeln!(out, "75th percentile error: {}%", fixed(summary.relative_error.q75 * 100.0, 6))?;
    writeln!(out, "Speedup/error correlation: {}", fixed(summary.correlation, 4))?;

    Ok(())
}

fn write_exceedance<W: Write>(out: &mut W, exceedance: &Exceedance, recorded_runs: u64) -> io::Result<()> {
    writeln!(
        out,
        "Runs with speedup > {:.1}x: {}/{} ({}%)",
        exceedance.threshold,
        exceedance.count,
        recorded_runs,
        fixed(exceedance.percent(), 1)
    )
}

/// Fixed-point with `decimals` places; non-finite values as `nan`/`inf`/`-inf`
pub fn fixed(value: f64, decimals: usize) -> String {
    match non_finite(value) {
        Some(s) => s.to_string(),
        None => format!("{:.*}", decimals, value),
    }
}

/// General format with 6 significant digits, like C's `%g`
///
/// Scientific notation is used when the decimal exponent is below -4 or at
/// least 6; trailing zeros are dropped in both forms.
pub fn general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if let Some(s) = non_finite(value) {
        return s.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // Exponent after rounding to the target precision
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedup_stats::{RunRecord, StatsRecord};
    use std::collections::BTreeMap;

    fn stats(num_runs: f64) -> StatsRecord {
        let metrics: BTreeMap<String, f64> = [
            ("avg_speedup", 1.24),
            ("min_speedup", 0.9),
            ("max_speedup", 2.0),
            ("avg_error", 0.024),
            ("min_error", 0.01),
            ("max_error", 0.05),
            ("num_runs", num_runs),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        StatsRecord::from_metrics(metrics).unwrap()
    }

    fn five_runs() -> Vec<RunRecord> {
        [(0.9, 0.01), (1.0, 0.02), (1.1, 0.01), (1.2, 0.03), (2.0, 0.05)]
            .into_iter()
            .enumerate()
            .map(|(i, (s, e))| RunRecord::new(i as u64 + 1, s, e))
            .collect()
    }

    fn render(stats: &StatsRecord, runs: &[RunRecord]) -> String {
        let mut out = Vec::new();
        write_report(&mut out, stats, &RunSummary::from_runs(runs)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_layout() {
        let text = render(&stats(5.0), &five_runs());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Statistics from 5 runs:");
        assert_eq!(lines[1], "Average speedup: 1.2400x");
        assert_eq!(lines[2], "Minimum speedup: 0.9000x");
        assert_eq!(lines[3], "Maximum speedup: 2.0000x");
        assert_eq!(lines[4], "Standard deviation speedup: 0.4393");
        assert_eq!(lines[5], "Average relative error: 0.024");
        assert_eq!(lines[8], "Standard deviation error: 0.0167332");
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], "Additional Statistics:");
        assert_eq!(lines[11], "Median speedup: 1.1000x");
        assert_eq!(lines[12], "25th percentile speedup: 1.0000x");
        assert_eq!(lines[13], "75th percentile speedup: 1.2000x");
        assert_eq!(lines[14], "Runs with speedup > 1.0x: 3/5 (60.0%)");
        assert_eq!(lines[15], "Runs with speedup > 1.5x: 1/5 (20.0%)");
        assert_eq!(lines[17], "Error Statistics:");
        assert_eq!(lines[18], "Median relative error: 2.000000%");
        assert_eq!(lines[21], "Speedup/error correlation: 0.9250");
    }

    #[test]
    fn test_recorded_run_count_mismatch_is_printed_as_is() {
        let text = render(&stats(8.0), &five_runs());
        assert!(text.starts_with("Statistics from 8 runs:\n"));
        // Denominator is the recorded count, percentage comes from the rows
        assert!(text.contains("Runs with speedup > 1.0x: 3/8 (60.0%)"));
    }

    #[test]
    fn test_single_run_reports_nan_std_dev() {
        let runs = [RunRecord::new(1, 1.3, 0.02)];
        let text = render(&stats(1.0), &runs);
        assert!(text.contains("Standard deviation speedup: nan\n"));
        assert!(text.contains("Standard deviation error: nan\n"));
        assert!(text.contains("Median speedup: 1.3000x"));
        assert!(text.contains("Runs with speedup > 1.0x: 1/1 (100.0%)"));
    }

    #[test]
    fn test_general_format() {
        assert_eq!(general(0.024), "0.024");
        assert_eq!(general(0.0001), "0.0001");
        assert_eq!(general(0.00001234), "1.234e-05");
        assert_eq!(general(2.5e-7), "2.5e-07");
        assert_eq!(general(123456.0), "123456");
        assert_eq!(general(1234567.0), "1.23457e+06");
        assert_eq!(general(1.0), "1");
        assert_eq!(general(0.0), "0");
        assert_eq!(general(-0.5), "-0.5");
        assert_eq!(general(f64::NAN), "nan");
    }

    #[test]
    fn test_fixed_format() {
        assert_eq!(fixed(1.23456, 4), "1.2346");
        assert_eq!(fixed(60.0, 1), "60.0");
        assert_eq!(fixed(f64::INFINITY, 4), "inf");
    }
}
