use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{Controller, RunPhase, RunReport, WorkerPlan};
use crate::error::{AppError, AppResult};
use crate::schedule::{Schedule, Stage, StageScheduler};
use crate::shutdown::{StopReason, StopSignal};
use crate::task::test_support::{CountingExecutor, StaticAuthenticator};
use crate::task::{Authenticator, TaskExecutor};
use crate::worker::WaitTime;

const TICK: Duration = Duration::from_millis(100);

fn run_paused<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn controller(
    stages: Vec<Stage>,
    authenticator: Arc<dyn Authenticator>,
    executor: Arc<dyn TaskExecutor>,
    max_iterations: u64,
    stop: &StopSignal,
) -> AppResult<Controller> {
    let scheduler = StageScheduler::with_default_floor(Schedule::new(stages)?);
    let plan = WorkerPlan {
        authenticator,
        executor,
        max_iterations,
        wait: WaitTime::constant(Duration::from_millis(100)),
    };
    Ok(Controller::new(scheduler, plan, stop.clone(), TICK))
}

fn expect_reason(report: &RunReport, reason: StopReason) -> AppResult<()> {
    if report.reason != reason {
        return Err(AppError::validation(format!(
            "Expected {:?}, got {:?}",
            reason, report
        )));
    }
    Ok(())
}

#[test]
fn run_stops_when_every_expected_worker_reports() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let executor = Arc::new(CountingExecutor::succeeding());
        let controller = controller(
            vec![Stage::from_secs(1, 50), Stage::from_secs(3600, 50)],
            Arc::new(StaticAuthenticator::granting()),
            executor.clone(),
            2,
            &stop,
        )?;

        let report = controller.run().await;
        expect_reason(&report, StopReason::AllWorkersCompleted)?;
        if report.expected != Some(50) || report.completions != 50 {
            return Err(AppError::validation(format!(
                "Unexpected tally: {:?}",
                report
            )));
        }
        if report.population.spawned != 50 || report.population.retired != 0 {
            return Err(AppError::validation(format!(
                "Unexpected population: {:?}",
                report.population
            )));
        }
        if executor.calls() != 100 || report.workers.iterations_succeeded != 100 {
            return Err(AppError::validation(format!(
                "Expected 100 iterations, saw {}",
                executor.calls()
            )));
        }
        if report.elapsed >= Duration::from_secs(60) {
            return Err(AppError::validation(format!(
                "Run lingered for {:?}",
                report.elapsed
            )));
        }
        Ok(())
    })
}

#[test]
fn credential_failures_still_complete_the_run() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let executor = Arc::new(CountingExecutor::succeeding());
        let controller = controller(
            vec![Stage::from_secs(1, 5), Stage::from_secs(60, 5)],
            Arc::new(StaticAuthenticator::refusing()),
            executor.clone(),
            10,
            &stop,
        )?;

        let report = controller.run().await;
        expect_reason(&report, StopReason::AllWorkersCompleted)?;
        if report.workers.credential_failures != 5 || executor.calls() != 0 {
            return Err(AppError::validation(format!(
                "Unexpected worker stats: {:?}",
                report.workers
            )));
        }
        Ok(())
    })
}

#[test]
fn drained_schedule_stops_after_retiring_everyone() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let controller = controller(
            vec![Stage::from_secs(1, 10), Stage::from_secs(2, 0)],
            Arc::new(StaticAuthenticator::granting()),
            Arc::new(CountingExecutor::succeeding()),
            1_000,
            &stop,
        )?;

        let report = controller.run().await;
        expect_reason(&report, StopReason::ScheduleDrained)?;
        if report.population.spawned != 10 || report.population.retired != 10 {
            return Err(AppError::validation(format!(
                "Unexpected population: {:?}",
                report.population
            )));
        }
        if report.completions != 0 {
            return Err(AppError::validation("Retired workers reported completion"));
        }
        if report.elapsed < Duration::from_secs(3) {
            return Err(AppError::validation(format!(
                "Stopped before the schedule ended: {:?}",
                report.elapsed
            )));
        }
        Ok(())
    })
}

#[test]
fn completed_phase_waits_for_live_workers() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let executor = Arc::new(CountingExecutor::succeeding());
        let controller = controller(
            vec![Stage::from_secs(1, 3)],
            Arc::new(StaticAuthenticator::granting()),
            executor.clone(),
            50,
            &stop,
        )?;
        let mut phase = controller.phase();

        let handle = tokio::spawn(controller.run());
        phase
            .wait_for(|current| *current == RunPhase::Completed)
            .await
            .map_err(|err| AppError::validation(format!("Phase channel closed: {}", err)))?;
        if stop.is_stopped() {
            return Err(AppError::validation("Stopped as soon as the schedule ended"));
        }

        let report = handle.await?;
        expect_reason(&report, StopReason::AllWorkersCompleted)?;
        if executor.calls() != 150 || report.completions != 3 {
            return Err(AppError::validation(format!(
                "Workers were cut short: {} calls, {:?}",
                executor.calls(),
                report
            )));
        }
        Ok(())
    })
}

#[test]
fn external_stop_aborts_the_run() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let controller = controller(
            vec![Stage::from_secs(600, 20)],
            Arc::new(StaticAuthenticator::granting()),
            Arc::new(CountingExecutor::succeeding()),
            u64::MAX,
            &stop,
        )?;

        let handle = tokio::spawn(controller.run());
        tokio::time::sleep(Duration::from_secs(5)).await;
        stop.trigger(StopReason::Aborted);

        let report = handle.await?;
        expect_reason(&report, StopReason::Aborted)?;
        if report.population.spawned == 0 || report.completions != 0 {
            return Err(AppError::validation(format!(
                "Unexpected report: {:?}",
                report
            )));
        }
        Ok(())
    })
}

#[test]
fn population_reaches_target_and_turns_steady() -> AppResult<()> {
    run_paused(async {
        let stop = StopSignal::new();
        let controller = controller(
            vec![Stage::from_secs(2, 20), Stage::from_secs(600, 20)],
            Arc::new(StaticAuthenticator::granting()),
            Arc::new(CountingExecutor::succeeding()),
            u64::MAX,
            &stop,
        )?;
        let mut phase = controller.phase();

        let handle = tokio::spawn(controller.run());
        tokio::time::timeout(
            Duration::from_secs(10),
            phase.wait_for(|current| *current == RunPhase::Steady),
        )
        .await
        .map_err(|err| AppError::validation(format!("Never became steady: {}", err)))?
        .map_err(|err| AppError::validation(format!("Phase channel closed: {}", err)))?;
        stop.trigger(StopReason::Aborted);

        let report = handle.await?;
        if report.population.spawned != 20 || report.population.peak_live != 20 {
            return Err(AppError::validation(format!(
                "Unexpected population: {:?}",
                report.population
            )));
        }
        Ok(())
    })
}
