//! Runner pass metrics and statistics.
//!
//! Tracks how often a runner's worker has applied its scripts and how long a
//! full pass over them takes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Pass metrics tracked by a runner's worker thread.
///
/// Uses atomics for lock-free access: the worker records, the host reads.
#[derive(Debug, Default)]
pub struct RunnerMetrics {
    /// Completed passes over the script list
    passes: AtomicU64,

    /// Individual script applications across all passes
    scripts_applied: AtomicU64,

    /// Sum of all pass durations, in nanoseconds
    total_pass_nanos: AtomicU64,

    /// Longest pass observed, in nanoseconds
    peak_pass_nanos: AtomicU64,
}

impl RunnerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed pass that applied `scripts` scripts.
    pub fn record_pass(&self, duration: Duration, scripts: usize) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.passes.fetch_add(1, Ordering::Relaxed);
        self.scripts_applied
            .fetch_add(scripts as u64, Ordering::Relaxed);
        self.total_pass_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.peak_pass_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    pub fn scripts_applied(&self) -> u64 {
        self.scripts_applied.load(Ordering::Relaxed)
    }

    /// Longest pass observed.
    pub fn peak_pass_time(&self) -> Duration {
        Duration::from_nanos(self.peak_pass_nanos.load(Ordering::Relaxed))
    }

    /// Average pass duration, zero before the first pass.
    pub fn avg_pass_time(&self) -> Duration {
        let passes = self.passes();
        if passes == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_pass_nanos.load(Ordering::Relaxed) / passes)
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Individual fields are read atomically; the snapshot as a whole may be
    /// inconsistent while the worker is still running.
    pub fn snapshot(&self) -> RunnerMetricsSnapshot {
        RunnerMetricsSnapshot {
            passes: self.passes(),
            scripts_applied: self.scripts_applied(),
            avg_pass_time: self.avg_pass_time(),
            peak_pass_time: self.peak_pass_time(),
        }
    }
}

/// Snapshot of runner metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunnerMetricsSnapshot {
    pub passes: u64,
    pub scripts_applied: u64,
    pub avg_pass_time: Duration,
    pub peak_pass_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metrics() {
        let metrics = RunnerMetrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.passes, 0);
        assert_eq!(snapshot.scripts_applied, 0);
        assert_eq!(snapshot.avg_pass_time, Duration::ZERO);
        assert_eq!(snapshot.peak_pass_time, Duration::ZERO);
    }

    #[test]
    fn records_passes() {
        let metrics = RunnerMetrics::new();
        metrics.record_pass(Duration::from_micros(10), 3);
        metrics.record_pass(Duration::from_micros(30), 3);

        assert_eq!(metrics.passes(), 2);
        assert_eq!(metrics.scripts_applied(), 6);
        assert_eq!(metrics.avg_pass_time(), Duration::from_micros(20));
        assert_eq!(metrics.peak_pass_time(), Duration::from_micros(30));
    }
}
