//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use super::batch::{BatchResult, BatchState, ItemFailure};
use std::time::Duration;

/// Summary of a batch export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of products in the batch
    pub total: usize,

    /// Products included in the artifact
    pub succeeded: usize,

    /// Products skipped
    pub failed: usize,

    /// Why each skipped product failed, in input order
    pub failures: Vec<ItemFailure>,

    /// Final batch state
    pub state: BatchState,

    /// Duration of the export
    pub duration: Duration,

    /// The batch was large enough to use the reduced raster profile
    pub quality_downgraded: bool,

    /// Whether the export was stopped by a shutdown signal
    pub interrupted: bool,

    /// Artifact file name, when one was produced
    pub artifact_name: Option<String>,

    /// Artifact size in bytes, when one was produced
    pub artifact_bytes: Option<usize>,
}

impl ExportSummary {
    /// Create a new summary for a batch of `total` products
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            state: BatchState::Idle,
            duration: Duration::from_secs(0),
            quality_downgraded: false,
            interrupted: false,
            artifact_name: None,
            artifact_bytes: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Copies per-item outcomes into the summary
    pub fn record(&mut self, result: &BatchResult) {
        self.succeeded = result.succeeded.len();
        self.failed = result.failed.len();
        self.failures = result.failed.clone();
    }

    /// Every product made it into the artifact
    pub fn is_successful(&self) -> bool {
        self.state == BatchState::Done && self.failed == 0
    }

    /// An artifact exists but some products were skipped
    pub fn is_partial(&self) -> bool {
        self.state == BatchState::Done && self.failed > 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed,
            state = %self.state,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            quality_downgraded = self.quality_downgraded,
            artifact = self.artifact_name.as_deref().unwrap_or("-"),
            bytes = self.artifact_bytes.unwrap_or(0),
            "Export finished"
        );

        if self.interrupted {
            tracing::warn!(
                processed = self.succeeded + self.failed,
                total = self.total,
                "Export was interrupted; no artifact was produced"
            );
        }

        for failure in &self.failures {
            tracing::warn!(
                index = failure.index,
                product = %failure.product,
                reason = %failure.reason,
                "Poster skipped"
            );
        }
    }
}
