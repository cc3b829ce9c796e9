//! Worker tasks: bounded iterations, a single completion report, then drain.
mod run;
mod stats;
mod wait;


use std::fmt;

pub use run::{CompletionMessage, IterationState, WorkerContext, WorkerExit, run_worker};
pub use stats::{WorkerStats, WorkerStatsSnapshot};
pub use wait::WaitTime;

/// Identity of a worker within one run. Assigned by the controller in spawn
/// order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}
