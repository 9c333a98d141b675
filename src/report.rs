//! Human-readable and JSON rendering of comparison statistics.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::batch::{BatchSummary, ItemReport};
use crate::compare::ComparisonResult;

/// Line printed after every per-item and summary block.
pub const SEPARATOR: &str = "--------------------------";

/// Percentage of `part` in `whole`, or `None` when `whole` is zero.
pub fn percentage(part: u32, whole: u32) -> Option<f32> {
    if whole == 0 {
        None
    } else {
        Some(100.0 * part as f32 / whole as f32)
    }
}

/// Derived rates shown alongside the raw counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportFigures {
    pub num_frames: usize,
    pub unvoiced_as_voiced_pct: Option<f32>,
    pub voiced_as_unvoiced_pct: Option<f32>,
    pub gross_error_pct: Option<f32>,
    pub gross_threshold_pct: f64,
    pub fine_error_pct: f32,
}

impl ReportFigures {
    pub fn new(num_frames: usize, result: &ComparisonResult, gross_threshold: f32) -> Self {
        Self {
            num_frames,
            unvoiced_as_voiced_pct: percentage(result.num_unvoiced_voiced, result.num_unvoiced),
            voiced_as_unvoiced_pct: percentage(result.num_voiced_unvoiced, result.num_voiced),
            gross_error_pct: percentage(result.num_gross_errors, result.num_voiced_voiced),
            gross_threshold_pct: threshold_label(gross_threshold),
            fine_error_pct: 100.0 * result.fine_error,
        }
    }
}

/// Threshold as a percentage, rounded so `0.15` reads `15` rather than
/// `15.000001`.
fn threshold_label(gross_threshold: f32) -> f64 {
    (f64::from(gross_threshold) * 100.0 * 1e4).round() / 1e4
}

fn format_pct(value: Option<f32>) -> String {
    match value {
        Some(pct) => format!("{:.2}%", pct),
        None => "N/A".to_string(),
    }
}

/// Render the five-line statistics block for one item or for the summary.
pub fn format_results(num_frames: usize, result: &ComparisonResult, gross_threshold: f32) -> String {
    let figures = ReportFigures::new(num_frames, result, gross_threshold);
    format!(
        "Num. frames:\t{} = {} unvoiced + {} voiced\n\
         Unvoiced frames as voiced:\t{}/{} ({})\n\
         Voiced frames as unvoiced:\t{}/{} ({})\n\
         Gross voiced errors (+{}%):\t{}/{} ({})\n\
         MSE of fine errors:\t{:.2}%\n",
        figures.num_frames,
        result.num_unvoiced,
        result.num_voiced,
        result.num_unvoiced_voiced,
        result.num_unvoiced,
        format_pct(figures.unvoiced_as_voiced_pct),
        result.num_voiced_unvoiced,
        result.num_voiced,
        format_pct(figures.voiced_as_unvoiced_pct),
        figures.gross_threshold_pct,
        result.num_gross_errors,
        result.num_voiced_voiced,
        format_pct(figures.gross_error_pct),
        figures.fine_error_pct,
    )
}

/// Destination for evaluation output, fed in manifest order.
pub trait ReportSink {
    /// Called once both tracks of an item are loaded, before reconciliation.
    fn begin_item(&mut self, reference: &Path, test: &Path) -> io::Result<()>;

    fn item(&mut self, report: &ItemReport) -> io::Result<()>;

    /// Only called when more than one item was evaluated.
    fn summary(&mut self, summary: &BatchSummary) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Streams the classic console report as items complete.
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn begin_item(&mut self, reference: &Path, test: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "### Compare {} and {}",
            reference.display(),
            test.display()
        )
    }

    fn item(&mut self, report: &ItemReport) -> io::Result<()> {
        write!(
            self.out,
            "{}",
            format_results(report.frames, &report.result, report.gross_threshold)
        )?;
        write!(self.out, "{}\n\n", SEPARATOR)
    }

    fn summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
        writeln!(self.out, "### Summary")?;
        write!(
            self.out,
            "{}",
            format_results(summary.frames, &summary.totals, summary.gross_threshold)
        )?;
        write!(self.out, "{}\n\n", SEPARATOR)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[derive(Debug, Serialize)]
struct JsonItem {
    #[serde(flatten)]
    report: ItemReport,
    figures: ReportFigures,
}

#[derive(Debug, Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    summary: BatchSummary,
    figures: ReportFigures,
}

#[derive(Debug, Serialize)]
struct JsonPayload<'a> {
    items: &'a [JsonItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a JsonSummary>,
}

/// Collects every block and writes a single JSON document on `finish`.
pub struct JsonReport<W: Write> {
    out: W,
    items: Vec<JsonItem>,
    summary: Option<JsonSummary>,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            items: Vec::new(),
            summary: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn begin_item(&mut self, _reference: &Path, _test: &Path) -> io::Result<()> {
        Ok(())
    }

    fn item(&mut self, report: &ItemReport) -> io::Result<()> {
        self.items.push(JsonItem {
            report: report.clone(),
            figures: ReportFigures::new(report.frames, &report.result, report.gross_threshold),
        });
        Ok(())
    }

    fn summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
        self.summary = Some(JsonSummary {
            summary: summary.clone(),
            figures: ReportFigures::new(summary.frames, &summary.totals, summary.gross_threshold),
        });
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let payload = JsonPayload {
            items: &self.items,
            summary: self.summary.as_ref(),
        };
        serde_json::to_writer_pretty(&mut self.out, &payload)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ComparisonResult {
        ComparisonResult {
            num_voiced: 2,
            num_unvoiced: 2,
            num_voiced_unvoiced: 1,
            num_unvoiced_voiced: 1,
            num_voiced_voiced: 1,
            num_gross_errors: 1,
            fine_error: 0.0,
        }
    }

    #[test]
    fn percentage_handles_zero_denominator() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(1, 4), Some(25.0));
    }

    #[test]
    fn formats_classic_block() {
        let text = format_results(4, &sample_result(), 0.2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Num. frames:\t4 = 2 unvoiced + 2 voiced");
        assert_eq!(lines[1], "Unvoiced frames as voiced:\t1/2 (50.00%)");
        assert_eq!(lines[2], "Voiced frames as unvoiced:\t1/2 (50.00%)");
        assert_eq!(lines[3], "Gross voiced errors (+20%):\t1/1 (100.00%)");
        assert_eq!(lines[4], "MSE of fine errors:\t0.00%");
    }

    #[test]
    fn zero_denominators_render_not_available() {
        let result = ComparisonResult {
            num_unvoiced: 3,
            ..ComparisonResult::default()
        };
        let text = format_results(3, &result, 0.2);
        assert!(text.contains("Voiced frames as unvoiced:\t0/0 (N/A)"));
        assert!(text.contains("Gross voiced errors (+20%):\t0/0 (N/A)"));
        assert!(!text.contains("NaN"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn figures_scale_fine_error() {
        let result = ComparisonResult {
            fine_error: 0.05,
            ..sample_result()
        };
        let figures = ReportFigures::new(4, &result, 0.2);
        assert!((figures.fine_error_pct - 5.0).abs() < 1e-4);
        assert_eq!(figures.gross_error_pct, Some(100.0));
    }

    #[test]
    fn threshold_label_drops_float_noise() {
        let text = format_results(4, &sample_result(), 0.15);
        assert!(text.contains("Gross voiced errors (+15%):"), "got {text}");

        let figures = ReportFigures::new(4, &sample_result(), 0.125);
        assert_eq!(figures.gross_threshold_pct, 12.5);
    }
}
