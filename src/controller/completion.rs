use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::shutdown::{StopReason, StopSignal};
use crate::worker::{CompletionMessage, WorkerId};

/// What the tracker did with one completion report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Counted; the expected total has not been reached.
    Counted,
    /// Counted, and this report made the count equal the expected total.
    ThresholdReached,
    /// Counted after the threshold already fired. Never re-fires.
    AfterThreshold,
    /// The sender had already reported. Not counted.
    Duplicate,
}

/// Single-owner tally of worker completion reports.
///
/// Lives inside the controller and is only touched from its serialized
/// message-processing step, so it needs no locking. `expected` is armed
/// once; the threshold fires on equality, at most once per run.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    expected: Option<u64>,
    count: u64,
    reported: HashSet<WorkerId>,
    fired: bool,
}

impl CompletionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the expected population. Returns `false` if already armed.
    pub const fn arm(&mut self, expected: u64) -> bool {
        if self.expected.is_some() {
            return false;
        }
        self.expected = Some(expected);
        true
    }

    #[must_use]
    pub const fn expected(&self) -> Option<u64> {
        self.expected
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn threshold_fired(&self) -> bool {
        self.fired
    }

    #[must_use]
    pub fn has_reported(&self, worker_id: WorkerId) -> bool {
        self.reported.contains(&worker_id)
    }

    pub fn on_completion(&mut self, sender: WorkerId) -> CompletionOutcome {
        if !self.reported.insert(sender) {
            return CompletionOutcome::Duplicate;
        }
        self.count = self.count.saturating_add(1);
        if self.fired {
            return CompletionOutcome::AfterThreshold;
        }
        match self.expected {
            Some(expected) if self.count == expected => {
                self.fired = true;
                CompletionOutcome::ThresholdReached
            }
            Some(_) | None => CompletionOutcome::Counted,
        }
    }
}

/// Feeds one inbound message to the tracker and fires the stop signal when
/// the expected total is reached.
pub fn process_completion(
    tracker: &mut CompletionTracker,
    message: CompletionMessage,
    stop: &StopSignal,
) -> CompletionOutcome {
    let outcome = tracker.on_completion(message.worker_id);
    match outcome {
        CompletionOutcome::ThresholdReached => {
            if stop.trigger(StopReason::AllWorkersCompleted) {
                info!(
                    "All {} expected workers reported completion; stopping run",
                    tracker.count()
                );
            }
        }
        CompletionOutcome::Duplicate => {
            warn!("Ignoring duplicate completion from {}", message.worker_id);
        }
        CompletionOutcome::Counted | CompletionOutcome::AfterThreshold => {
            debug!(
                "Completion from {} ({} of {:?})",
                message.worker_id,
                tracker.count(),
                tracker.expected()
            );
        }
    }
    outcome
}
