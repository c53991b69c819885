use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate byte counters shared by every chunk task. `expected_bytes` is
/// fixed before any task starts; `completed_bytes` is bumped exactly once
/// per chunk, on that chunk's terminal success.
pub struct ProgressTracker {
    expected_bytes: u64,
    completed_bytes: AtomicU64,
}

impl ProgressTracker {
    pub fn new(expected_bytes: u64) -> Self {
        Self {
            expected_bytes,
            completed_bytes: AtomicU64::new(0),
        }
    }

    pub fn expected_bytes(&self) -> u64 {
        self.expected_bytes
    }

    pub fn completed_bytes(&self) -> u64 {
        self.completed_bytes.load(Ordering::Relaxed)
    }

    /// Records one chunk's completion and returns the new running total.
    pub fn record_completed(&self, size: u64) -> u64 {
        self.completed_bytes.fetch_add(size, Ordering::Relaxed) + size
    }
}
