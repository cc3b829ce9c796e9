use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::worker::{WorkerContext, WorkerExit, WorkerId, run_worker};

use super::CompletionTracker;

struct WorkerSlot {
    id: WorkerId,
    retire: oneshot::Sender<()>,
    handle: JoinHandle<WorkerExit>,
}

/// Lifetime counters for the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub spawned: u64,
    pub retired: u64,
    pub peak_live: u64,
    pub lost: u64,
}

/// Result of one [`Population::adjust`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub spawned: u64,
    pub retired: u64,
    pub live: u64,
}

/// The set of live workers. Mutated only by the controller.
///
/// Moves toward a target at a rate in workers per second. Fractional
/// progress is carried between calls so slow rates still make headway.
/// Shrinking retires the most recently spawned workers first.
pub struct Population {
    context: Arc<WorkerContext>,
    slots: Vec<WorkerSlot>,
    retiring: Vec<JoinHandle<WorkerExit>>,
    next_id: u64,
    budget: f64,
    stats: PopulationStats,
}

impl Population {
    #[must_use]
    pub fn new(context: Arc<WorkerContext>) -> Self {
        Self {
            context,
            slots: Vec::new(),
            retiring: Vec::new(),
            next_id: 0,
            budget: 0.0,
            stats: PopulationStats::default(),
        }
    }

    #[must_use]
    pub fn live(&self) -> u64 {
        u64::try_from(self.slots.len()).unwrap_or(u64::MAX)
    }

    pub fn live_ids(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    #[must_use]
    pub const fn stats(&self) -> PopulationStats {
        self.stats
    }

    /// `true` when every live worker has a completion on record. Vacuously
    /// true for an empty population.
    #[must_use]
    pub fn all_reported(&self, tracker: &CompletionTracker) -> bool {
        self.live_ids().all(|id| tracker.has_reported(id))
    }

    /// Spawns or retires workers toward `target`, at most
    /// `rate * interval` of them this call (plus carried fractions).
    pub fn adjust(&mut self, target: u64, rate: f64, interval: Duration) -> Adjustment {
        let live = self.live();
        if live == target {
            self.budget = 0.0;
            return Adjustment {
                spawned: 0,
                retired: 0,
                live,
            };
        }

        let gap = live.abs_diff(target);
        self.budget = (self.budget + rate * interval.as_secs_f64()).min(gap as f64);
        let whole = self.budget.floor();
        self.budget -= whole;
        let steps = (whole as u64).min(gap);

        let mut adjustment = Adjustment::default();
        for _ in 0..steps {
            if live < target {
                self.spawn_one();
                adjustment.spawned = adjustment.spawned.saturating_add(1);
            } else if self.retire_newest() {
                adjustment.retired = adjustment.retired.saturating_add(1);
            }
        }
        adjustment.live = self.live();
        adjustment
    }

    /// Drops slots whose task already ended without being retired or
    /// stopped, i.e. a worker that panicked. Also forgets retired workers
    /// that have exited.
    pub fn reap(&mut self) -> u64 {
        self.retiring.retain(|handle| !handle.is_finished());
        let before = self.slots.len();
        self.slots.retain(|slot| {
            if slot.handle.is_finished() {
                warn!("Worker {} exited unexpectedly; dropping it", slot.id);
                return false;
            }
            true
        });
        let lost = u64::try_from(before.saturating_sub(self.slots.len())).unwrap_or(u64::MAX);
        self.stats.lost = self.stats.lost.saturating_add(lost);
        lost
    }

    /// Waits for every worker task to exit. The stop signal must already
    /// have fired.
    pub async fn shutdown(self) -> PopulationStats {
        let handles = self
            .slots
            .into_iter()
            .map(|slot| slot.handle)
            .chain(self.retiring);
        let mut failed = 0_u64;
        for err in join_all(handles).await.into_iter().filter_map(Result::err) {
            warn!("Worker task failed to join: {}", err);
            failed = failed.saturating_add(1);
        }
        if failed > 0 {
            debug!("{} worker task(s) did not exit cleanly", failed);
        }
        self.stats
    }

    fn spawn_one(&mut self) {
        let id = WorkerId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let (retire, retire_rx) = oneshot::channel();
        let handle = tokio::spawn(run_worker(id, Arc::clone(&self.context), retire_rx));
        self.slots.push(WorkerSlot { id, retire, handle });
        self.stats.spawned = self.stats.spawned.saturating_add(1);
        self.stats.peak_live = self.stats.peak_live.max(self.live());
    }

    fn retire_newest(&mut self) -> bool {
        let Some(slot) = self.slots.pop() else {
            return false;
        };
        if slot.retire.send(()).is_err() {
            debug!("Worker {} already gone at retirement", slot.id);
        }
        self.retiring.push(slot.handle);
        self.stats.retired = self.stats.retired.saturating_add(1);
        true
    }
}
