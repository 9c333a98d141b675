//! Batch driver: walks a manifest, scores each item and keeps running totals.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::compare::{compare, reconcile_lengths, ComparisonResult};
use crate::config::EvalConfig;
use crate::error::{EvalError, TrackRole};
use crate::f0::F0Track;
use crate::manifest::Manifest;
use crate::report::ReportSink;

/// Outcome for a single manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub reference_path: PathBuf,
    pub test_path: PathBuf,
    /// Frame counts as read, before reconciliation
    pub reference_frames: usize,
    pub test_frames: usize,
    /// Frames actually compared
    pub frames: usize,
    pub gross_threshold: f32,
    pub result: ComparisonResult,
}

/// Aggregate over every evaluated item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub items: usize,
    pub frames: usize,
    pub gross_threshold: f32,
    /// Summed counters; `fine_error` is the mean of per-item fine errors
    pub totals: ComparisonResult,
}

/// Running sums across items.
///
/// Fine error is summed as-is (not squared) and averaged per item, so every
/// file weighs the same regardless of its length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTotals {
    pub items: usize,
    pub frames: usize,
    pub counts: ComparisonResult,
    pub fine_error_sum: f32,
}

impl BatchTotals {
    pub fn add(&mut self, frames: usize, result: &ComparisonResult) {
        self.items += 1;
        self.frames += frames;
        self.counts.num_voiced += result.num_voiced;
        self.counts.num_unvoiced += result.num_unvoiced;
        self.counts.num_voiced_unvoiced += result.num_voiced_unvoiced;
        self.counts.num_unvoiced_voiced += result.num_unvoiced_voiced;
        self.counts.num_voiced_voiced += result.num_voiced_voiced;
        self.counts.num_gross_errors += result.num_gross_errors;
        self.fine_error_sum += result.fine_error;
    }

    /// Mean of per-item fine errors, zero when nothing was added.
    pub fn mean_fine_error(&self) -> f32 {
        if self.items == 0 {
            0.0
        } else {
            self.fine_error_sum / self.items as f32
        }
    }

    pub fn summary(&self, gross_threshold: f32) -> BatchSummary {
        BatchSummary {
            items: self.items,
            frames: self.frames,
            gross_threshold,
            totals: ComparisonResult {
                fine_error: self.mean_fine_error(),
                ..self.counts
            },
        }
    }
}

/// Scores every item of a manifest against a data directory.
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Evaluate all items in manifest order.
    ///
    /// The first error aborts the batch; blocks already handed to `sink`
    /// stay written. A summary is emitted only for more than one item.
    pub fn run(
        &self,
        manifest: &Manifest,
        sink: &mut dyn ReportSink,
    ) -> Result<BatchTotals, EvalError> {
        let mut totals = BatchTotals::default();

        for id in manifest.iter() {
            let report = self.evaluate_item(id, sink)?;
            sink.item(&report)?;
            totals.add(report.frames, &report.result);
        }

        if totals.items > 1 {
            let summary = totals.summary(self.config.comparison.gross_threshold);
            tracing::info!(
                items = summary.items,
                frames = summary.frames,
                mean_fine_error = summary.totals.fine_error,
                "batch complete"
            );
            sink.summary(&summary)?;
        }
        sink.finish()?;
        Ok(totals)
    }

    fn evaluate_item(&self, id: &str, sink: &mut dyn ReportSink) -> Result<ItemReport, EvalError> {
        let layout = &self.config.data;
        let reference_path = layout.reference_path(id);
        let test_path = layout.test_path(id);

        let mut reference = self.load_track(TrackRole::Reference, &reference_path)?;
        let mut test = self.load_track(TrackRole::Test, &test_path)?;
        sink.begin_item(&reference_path, &test_path)?;

        let reference_frames = reference.len();
        let test_frames = test.len();
        reconcile_lengths(id, &mut reference, &mut test, &self.config.reconcile)?;

        let result = compare(reference.values(), test.values(), &self.config.comparison);
        tracing::debug!(
            item = id,
            frames = reference.len(),
            gross = result.num_gross_errors,
            fine_error = result.fine_error,
            "item compared"
        );

        Ok(ItemReport {
            id: id.to_string(),
            reference_path,
            test_path,
            reference_frames,
            test_frames,
            frames: reference.len(),
            gross_threshold: self.config.comparison.gross_threshold,
            result,
        })
    }

    fn load_track(&self, role: TrackRole, path: &Path) -> Result<F0Track, EvalError> {
        F0Track::load(path, self.config.parsing)
            .map_err(|source| EvalError::track(role, path.to_path_buf(), source))
    }
}
