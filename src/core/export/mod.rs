//! Export orchestration and batch processing
//!
//! This module provides the export pipeline for Cartaz, including:
//! - One-poster exports (PDF or PNG)
//! - Batch exports into a ZIP archive with a combined document
//! - Progress reporting, cancellation and summary reporting

pub mod batch;
pub mod coordinator;
pub mod progress;
pub mod summary;

pub use batch::{BatchResult, BatchState, ItemFailure, ItemSuccess};
pub use coordinator::{BatchOutcome, ExportCoordinator, SingleFormat};
pub use progress::{ProgressCallback, ProgressTracker};
pub use summary::ExportSummary;
