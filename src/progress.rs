//! Progress reporting
//!
//! The engine reports record counts through an injected [`ProgressReporter`]
//! rather than rendering progress itself. The CLI installs [`LogProgress`];
//! library callers can plug in their own sink or leave the default
//! [`NoopProgress`] in place.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Receives increments of "records fetched so far" out of an expected total.
///
/// Implementations are called from concurrent page workers and must be
/// cheap: no I/O beyond emitting a log line or updating a gauge.
pub trait ProgressReporter: Send + Sync {
    /// Called once per fetch when the expected record total is known
    fn on_total(&self, expected: u64);

    /// Called after each successful page with the number of records it added
    fn on_records(&self, count: u64);
}

/// Reporter that discards all updates
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn on_total(&self, _expected: u64) {}

    fn on_records(&self, _count: u64) {}
}

/// Reporter that emits a tracing line as records accumulate
#[derive(Debug)]
pub struct LogProgress {
    expected: AtomicU64,
    fetched: AtomicU64,
    emitted: AtomicU64,
    /// Emit a line every this many records
    interval: u64,
}

impl LogProgress {
    /// Create a reporter that logs every `interval` records
    pub fn new(interval: u64) -> Self {
        Self {
            expected: AtomicU64::new(0),
            fetched: AtomicU64::new(0),
            emitted: AtomicU64::new(0),
            interval: interval.max(1),
        }
    }

    /// Records fetched so far
    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressReporter for LogProgress {
    fn on_total(&self, expected: u64) {
        self.expected.store(expected, Ordering::Relaxed);
        info!(expected, "Downloading records");
    }

    fn on_records(&self, count: u64) {
        let fetched = self.fetched.fetch_add(count, Ordering::Relaxed) + count;
        let expected = self.expected.load(Ordering::Relaxed);

        let last = self.emitted.load(Ordering::Relaxed);
        if fetched >= expected || fetched.saturating_sub(last) >= self.interval {
            self.emitted.store(fetched, Ordering::Relaxed);
            info!(fetched, expected, "Download progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_accumulates() {
        let progress = LogProgress::new(10);
        progress.on_total(25);
        progress.on_records(10);
        progress.on_records(10);
        progress.on_records(5);
        assert_eq!(progress.fetched(), 25);
    }

    #[test]
    fn test_noop_progress_is_inert() {
        let progress = NoopProgress;
        progress.on_total(100);
        progress.on_records(50);
    }
}
