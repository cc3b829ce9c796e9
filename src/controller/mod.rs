//! The run controller.
//!
//! One [`Controller`] per run polls the [`StageScheduler`](crate::schedule::StageScheduler)
//! on a fixed cadence, grows or shrinks the live [`Population`] toward the
//! current target, and tallies worker completion reports in a
//! [`CompletionTracker`] until the run can stop.
mod clock;
mod completion;
mod population;
mod runner;

#[cfg(test)]
mod tests;

pub use clock::RunClock;
pub use completion::{CompletionOutcome, CompletionTracker, process_completion};
pub use population::{Adjustment, Population, PopulationStats};
pub use runner::{Controller, RunPhase, RunReport, WorkerPlan};
