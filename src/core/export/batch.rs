//! Per-item batch bookkeeping
//!
//! A batch never stops on a bad product: each item either succeeds or is
//! recorded as a failure with the reason, and the batch moves on.

use crate::domain::RenderError;
use std::fmt;

/// Lifecycle of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    /// Processing the item at `index`
    Running { index: usize },
    /// Writing the combined document and archive
    Finalizing,
    Done,
    /// No artifact was produced
    Failed,
    /// Stopped by a shutdown signal
    Cancelled,
}

impl BatchState {
    /// Returns true once the batch can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchState::Done | BatchState::Failed | BatchState::Cancelled
        )
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Idle => write!(f, "idle"),
            BatchState::Running { index } => write!(f, "running (item {})", index + 1),
            BatchState::Finalizing => write!(f, "finalizing"),
            BatchState::Done => write!(f, "done"),
            BatchState::Failed => write!(f, "failed"),
            BatchState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A product that made it into the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSuccess {
    pub index: usize,
    pub product: String,
    /// Entry name inside the archive
    pub file_name: String,
}

/// A product that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub product: String,
    pub reason: RenderError,
}

/// Outcome of every item in a batch, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub succeeded: Vec<ItemSuccess>,
    pub failed: Vec<ItemFailure>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self, index: usize, product: impl Into<String>, file_name: String) {
        self.succeeded.push(ItemSuccess {
            index,
            product: product.into(),
            file_name,
        });
    }

    pub fn add_failure(&mut self, index: usize, product: impl Into<String>, reason: RenderError) {
        self.failed.push(ItemFailure {
            index,
            product: product.into(),
            reason,
        });
    }

    /// Items processed so far
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Indices of the items that made it into the artifact
    pub fn succeeded_indices(&self) -> Vec<usize> {
        self.succeeded.iter().map(|item| item.index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_tracks_items() {
        let mut result = BatchResult::new();
        result.add_success(0, "Arroz", "arroz.pdf".to_string());
        result.add_failure(
            1,
            "Feijão",
            RenderError::AssetUnavailable("banner.png".to_string()),
        );
        result.add_success(2, "Leite", "leite.pdf".to_string());

        assert_eq!(result.processed(), 3);
        assert_eq!(result.succeeded_indices(), vec![0, 2]);
        assert_eq!(result.failed[0].index, 1);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BatchState::Idle.is_terminal());
        assert!(!BatchState::Running { index: 3 }.is_terminal());
        assert!(!BatchState::Finalizing.is_terminal());
        assert!(BatchState::Done.is_terminal());
        assert!(BatchState::Failed.is_terminal());
        assert!(BatchState::Cancelled.is_terminal());
        assert_eq!(BatchState::Running { index: 0 }.to_string(), "running (item 1)");
    }
}
