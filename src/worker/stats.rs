use std::sync::atomic::{AtomicU64, Ordering};

/// Counters written by workers and read once by the run report.
#[derive(Debug, Default)]
pub struct WorkerStats {
    iterations_succeeded: AtomicU64,
    iterations_failed: AtomicU64,
    credential_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStatsSnapshot {
    pub iterations_succeeded: u64,
    pub iterations_failed: u64,
    pub credential_failures: u64,
}

impl WorkerStats {
    pub(crate) fn record_success(&self) {
        self.iterations_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.iterations_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_credential_failure(&self) {
        self.credential_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            iterations_succeeded: self.iterations_succeeded.load(Ordering::Relaxed),
            iterations_failed: self.iterations_failed.load(Ordering::Relaxed),
            credential_failures: self.credential_failures.load(Ordering::Relaxed),
        }
    }
}
