//! Structured spans for analysis stages
//!
//! Every stage of a run (loading, superposition, block averaging, ...) gets
//! an [`AnalysisSpan`] carrying the run's correlation id and its timing.

use std::time::Instant;
use tracing::{field, span, Level, Span};
use uuid::Uuid;

/// Span for one analysis stage
pub struct AnalysisSpan {
    span: Span,
    start_time: Instant,
    stage: String,
}

impl AnalysisSpan {
    /// Create a stage span, falling back to the thread's correlation id
    pub fn new(stage: &str, correlation_id: Option<Uuid>) -> Self {
        let correlation_id = correlation_id.or_else(crate::logging::get_correlation_id);
        let span = span!(
            Level::INFO,
            "analysis_stage",
            stage = stage,
            correlation_id = field::Empty,
            samples = field::Empty,
            frames_total = field::Empty,
            frames_failed = field::Empty,
            success = field::Empty,
            execution_time_ms = field::Empty
        );
        if let Some(id) = correlation_id {
            span.record("correlation_id", field::display(id));
        }

        Self {
            span,
            start_time: Instant::now(),
            stage: stage.to_string(),
        }
    }

    /// Record the size of the stage input
    pub fn record_input(&self, samples: usize) {
        self.span.record("samples", samples);
        tracing::debug!(parent: &self.span, samples = samples, "Stage input recorded");
    }

    /// Record per-frame outcome counts of a trajectory stage
    pub fn record_frames(&self, total: usize, failed: usize) {
        self.span.record("frames_total", total);
        self.span.record("frames_failed", failed);
        if failed > 0 {
            tracing::warn!(
                parent: &self.span,
                frames_total = total,
                frames_failed = failed,
                "Frames failed in stage"
            );
        }
    }

    /// Record stage completion
    pub fn record_result(&self, success: bool, description: &str) {
        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        self.span.record("success", success);
        self.span.record("execution_time_ms", elapsed_ms);

        tracing::info!(
            parent: &self.span,
            stage = %self.stage,
            success = success,
            execution_time_ms = elapsed_ms,
            description = description,
            "Analysis stage completed"
        );
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}
