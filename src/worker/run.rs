use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::shutdown::{StopListener, StopSignal};
use crate::task::{Authenticator, TaskExecutor};

use super::{WaitTime, WorkerId, WorkerStats};

/// "I finished all my iterations." Carries nothing but the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionMessage {
    pub worker_id: WorkerId,
}

/// Everything a worker shares with its peers. Built once per run.
pub struct WorkerContext {
    pub authenticator: Arc<dyn Authenticator>,
    pub executor: Arc<dyn TaskExecutor>,
    pub max_iterations: u64,
    pub wait: WaitTime,
    pub completion_tx: mpsc::UnboundedSender<CompletionMessage>,
    pub stop: StopSignal,
    pub stats: Arc<WorkerStats>,
}

/// How a worker task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Released by the run-wide stop signal.
    Stopped { reported: bool },
    /// Removed by the controller while the population shrank.
    Retired { reported: bool },
}

/// Per-worker progress. Only the owning worker mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationState {
    completed: u64,
    max: u64,
}

impl IterationState {
    #[must_use]
    pub const fn new(max: u64) -> Self {
        Self { completed: 0, max }
    }

    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.completed >= self.max
    }

    const fn advance(&mut self) {
        self.completed = self.completed.saturating_add(1);
    }
}

/// Runs one worker until the run stops or the controller retires it.
///
/// The worker performs at most `max_iterations` task iterations, sends a
/// single [`CompletionMessage`], and then parks without doing further work.
/// A worker that cannot obtain a credential skips its iterations but still
/// reports, so the controller's expected count stays reachable.
pub async fn run_worker(
    id: WorkerId,
    context: Arc<WorkerContext>,
    mut retire: oneshot::Receiver<()>,
) -> WorkerExit {
    let mut stop = context.stop.listener();
    let mut state = IterationState::new(context.max_iterations);

    tokio::select! {
        biased;
        _ = stop.stopped() => return WorkerExit::Stopped { reported: false },
        _ = &mut retire => return WorkerExit::Retired { reported: false },
        () = work(id, &context, &mut state) => {}
    }

    let reported = report(id, &context, &stop);
    debug!(
        "Worker {} parked after {} iteration(s)",
        id,
        state.completed()
    );

    tokio::select! {
        biased;
        _ = stop.stopped() => WorkerExit::Stopped { reported },
        _ = &mut retire => WorkerExit::Retired { reported },
    }
}

async fn work(id: WorkerId, context: &WorkerContext, state: &mut IterationState) {
    let credential = match context.authenticator.acquire().await {
        Ok(credential) => credential,
        Err(err) => {
            error!("Worker {} aborting iterations: {}", id, err);
            context.stats.record_credential_failure();
            return;
        }
    };

    while !state.is_done() {
        match context.executor.execute(&credential).await {
            Ok(()) => context.stats.record_success(),
            Err(err) => {
                warn!("Worker {} iteration {} failed: {}", id, state.completed(), err);
                context.stats.record_failure();
            }
        }
        state.advance();

        if !state.is_done() {
            sleep(context.wait.next_delay()).await;
        }
    }
}

fn report(id: WorkerId, context: &WorkerContext, stop: &StopListener) -> bool {
    if stop.is_stopped() {
        return false;
    }
    if context
        .completion_tx
        .send(CompletionMessage { worker_id: id })
        .is_err()
    {
        warn!("Worker {} could not report completion: controller gone", id);
        return false;
    }
    true
}
