use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::schedule::{SchedulePosition, StageScheduler};
use crate::shutdown::{StopReason, StopSignal};
use crate::task::{Authenticator, TaskExecutor};
use crate::worker::{CompletionMessage, WaitTime, WorkerContext, WorkerStats, WorkerStatsSnapshot};

use super::{CompletionTracker, Population, PopulationStats, RunClock, process_completion};

/// Lifecycle of a run as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Live population differs from the current target.
    Ramping,
    /// Live population matches the current target.
    Steady,
    /// Schedule exhausted; no new workers, waiting for the rest to finish.
    Completed,
    Stopped(StopReason),
}

impl RunPhase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, RunPhase::Ramping | RunPhase::Steady)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Ramping => f.write_str("ramping"),
            RunPhase::Steady => f.write_str("steady"),
            RunPhase::Completed => f.write_str("completed"),
            RunPhase::Stopped(reason) => write!(f, "stopped ({})", reason.as_str()),
        }
    }
}

/// What every worker of the run is given.
pub struct WorkerPlan {
    pub authenticator: Arc<dyn Authenticator>,
    pub executor: Arc<dyn TaskExecutor>,
    pub max_iterations: u64,
    pub wait: WaitTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub reason: StopReason,
    pub elapsed: Duration,
    pub expected: Option<u64>,
    pub completions: u64,
    pub population: PopulationStats,
    pub workers: WorkerStatsSnapshot,
}

enum LoopEvent {
    Stop(StopReason),
    Completion(Option<CompletionMessage>),
    Tick,
}

pub struct Controller {
    scheduler: StageScheduler,
    population: Population,
    tracker: CompletionTracker,
    completion_rx: mpsc::UnboundedReceiver<CompletionMessage>,
    stop: StopSignal,
    stats: Arc<WorkerStats>,
    tick_interval: Duration,
    phase_tx: watch::Sender<RunPhase>,
    last_target: u64,
    last_tick: Option<Duration>,
    last_position: Option<SchedulePosition>,
}

impl Controller {
    #[must_use]
    pub fn new(
        scheduler: StageScheduler,
        plan: WorkerPlan,
        stop: StopSignal,
        tick_interval: Duration,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WorkerStats::default());
        let context = Arc::new(WorkerContext {
            authenticator: plan.authenticator,
            executor: plan.executor,
            max_iterations: plan.max_iterations,
            wait: plan.wait,
            completion_tx,
            stop: stop.clone(),
            stats: Arc::clone(&stats),
        });
        let (phase_tx, _) = watch::channel(RunPhase::Ramping);

        Self {
            scheduler,
            population: Population::new(context),
            tracker: CompletionTracker::new(),
            completion_rx,
            stop,
            stats,
            tick_interval,
            phase_tx,
            last_target: 0,
            last_tick: None,
            last_position: None,
        }
    }

    /// Observes phase transitions while [`Controller::run`] is in progress.
    #[must_use]
    pub fn phase(&self) -> watch::Receiver<RunPhase> {
        self.phase_tx.subscribe()
    }

    /// Drives the run until the stop signal fires, then joins every worker.
    ///
    /// The stop fires when the tracker reaches its expected total, when the
    /// schedule is exhausted and every remaining worker has reported, or
    /// externally (signal or run timeout).
    pub async fn run(mut self) -> RunReport {
        let clock = RunClock::start();
        let mut stop = self.stop.listener();
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut channel_open = true;

        info!(
            "Starting run: {} stage(s) over {:?}, peak {} worker(s), ramp floor {}/s",
            self.scheduler.schedule().len(),
            self.scheduler.schedule().total_duration(),
            self.scheduler.schedule().peak_users(),
            self.scheduler.floor()
        );

        let reason = loop {
            let event = tokio::select! {
                biased;
                reason = stop.stopped() => LoopEvent::Stop(reason),
                message = self.completion_rx.recv(), if channel_open => {
                    LoopEvent::Completion(message)
                }
                _ = ticker.tick() => LoopEvent::Tick,
            };

            match event {
                LoopEvent::Stop(reason) => break reason,
                LoopEvent::Completion(Some(message)) => self.on_completion(message),
                LoopEvent::Completion(None) => channel_open = false,
                LoopEvent::Tick => self.on_tick(clock.elapsed()),
            }
        };

        let elapsed = clock.elapsed();
        self.set_phase(RunPhase::Stopped(reason));

        let Self {
            population,
            tracker,
            stats,
            ..
        } = self;
        let population = population.shutdown().await;

        RunReport {
            reason,
            elapsed,
            expected: tracker.expected(),
            completions: tracker.count(),
            population,
            workers: stats.snapshot(),
        }
    }

    fn current_phase(&self) -> RunPhase {
        *self.phase_tx.borrow()
    }

    fn set_phase(&self, phase: RunPhase) {
        let changed = self.phase_tx.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            *current = phase;
            true
        });
        if !changed {
            return;
        }
        if phase.is_active() {
            debug!("Run phase: {}", phase);
        } else {
            info!("Run phase: {}", phase);
        }
    }

    fn on_completion(&mut self, message: CompletionMessage) {
        if self.tracker.arm(self.last_target) {
            info!(
                "First worker finished; expecting {} completion(s)",
                self.last_target
            );
        }
        process_completion(&mut self.tracker, message, &self.stop);
        if self.current_phase() == RunPhase::Completed {
            self.check_drained();
        }
    }

    fn on_tick(&mut self, elapsed: Duration) {
        if !self.current_phase().is_active() {
            if self.population.reap() > 0 {
                self.check_drained();
            }
            return;
        }

        let delta = self
            .last_tick
            .map_or(self.tick_interval, |previous| elapsed.saturating_sub(previous));
        self.last_tick = Some(elapsed);

        let Some(target) = self.scheduler.tick(elapsed) else {
            info!(
                "Schedule exhausted after {:?}; waiting on {} live worker(s) of {} spawned",
                elapsed,
                self.population.live(),
                self.population.stats().spawned
            );
            self.set_phase(RunPhase::Completed);
            self.population.reap();
            self.check_drained();
            return;
        };

        self.note_position(elapsed);
        self.last_target = target.users;
        self.population.reap();
        let adjustment = self.population.adjust(target.users, target.rate, delta);
        if adjustment.spawned > 0 || adjustment.retired > 0 {
            debug!(
                "Population {} -> target {} at {:.2}/s (+{} -{})",
                adjustment.live,
                target.users,
                target.rate,
                adjustment.spawned,
                adjustment.retired
            );
        }

        let phase = if adjustment.live == target.users {
            RunPhase::Steady
        } else {
            RunPhase::Ramping
        };
        self.set_phase(phase);
    }

    fn note_position(&mut self, elapsed: Duration) {
        let position = self.scheduler.schedule().position(elapsed);
        if self.last_position == Some(position) {
            return;
        }
        self.last_position = Some(position);
        if let SchedulePosition::InStage(index) = position
            && let Some(stage) = self.scheduler.schedule().stages().get(index)
        {
            info!(
                "Entering stage {}/{}: {} worker(s) over {:?}",
                index.saturating_add(1),
                self.scheduler.schedule().len(),
                stage.users,
                stage.duration
            );
        }
    }

    fn check_drained(&self) {
        if !self.population.all_reported(&self.tracker) {
            return;
        }
        if self.stop.trigger(StopReason::ScheduleDrained) {
            info!(
                "Schedule drained with {} live worker(s) all reported; stopping run",
                self.population.live()
            );
        }
    }
}
