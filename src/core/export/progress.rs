//! Batch progress reporting

/// Receives the batch percentage after every item
pub type ProgressCallback = Box<dyn FnMut(u8) + Send>;

/// Tracks completed items and turns them into percentages
///
/// Values are `round(completed / total * 100)`, never decrease, and stay at 99
/// or below until the last item is done.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
        }
    }

    /// Marks one more item as done and returns the new percentage
    pub fn advance(&mut self) -> u8 {
        self.completed = (self.completed + 1).min(self.total);
        self.percent()
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 || self.completed >= self.total {
            return 100;
        }
        let rounded = (self.completed * 100 + self.total / 2) / self.total;
        rounded.min(99) as u8
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
