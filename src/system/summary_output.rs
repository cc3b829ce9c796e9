use chrono::{DateTime, Local, SecondsFormat};

use crate::config::RunConfig;
use crate::controller::RunReport;

pub(crate) fn selection_lines(config: &RunConfig) -> Vec<String> {
    let schedule = config.scheduler.schedule();
    let mut lines = Vec::new();
    lines.push("Selections:".to_owned());
    lines.push(format!("host: {}", config.host));
    lines.push(format!("iterations_per_worker: {}", config.max_iterations));
    lines.push(format!(
        "stages: {} ({}s total, peak {} workers)",
        schedule.len(),
        schedule.total_duration().as_secs(),
        schedule.peak_users()
    ));
    for (index, stage) in schedule.stages().iter().enumerate() {
        lines.push(format!(
            "  stage {}: {}ms -> {} workers",
            index.saturating_add(1),
            stage.duration.as_millis(),
            stage.users
        ));
    }
    lines.push(format!("ramp_floor_per_s: {}", config.scheduler.floor()));
    lines.push(format!(
        "tick_interval_ms: {}",
        config.tick_interval.as_millis()
    ));
    lines.push(format!(
        "wait_ms: {}..{}",
        config.wait.min().as_millis(),
        config.wait.max().as_millis()
    ));
    lines.push(format!("token_path: {}", config.token_path));
    lines.push(format!("task_path: {}", config.task_path));
    lines.push(format!(
        "request_timeout_ms: {}",
        config.request_timeout.as_millis()
    ));
    lines.push(format!(
        "run_timeout_ms: {}",
        config
            .run_timeout
            .map_or_else(|| "none".to_owned(), |timeout| timeout.as_millis().to_string())
    ));
    lines
}

pub(crate) fn summary_lines(
    report: &RunReport,
    run_id: &str,
    started_at: DateTime<Local>,
) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Run summary:".to_owned());
    lines.push(format!("run_id: {}", run_id));
    lines.push(format!(
        "started_at: {}",
        started_at.to_rfc3339_opts(SecondsFormat::Secs, false)
    ));
    lines.push(format!("stop_reason: {}", report.reason.as_str()));
    lines.push(format!("elapsed_ms: {}", report.elapsed.as_millis()));
    lines.push(format!(
        "completions: {} / {}",
        report.completions,
        report
            .expected
            .map_or_else(|| "unarmed".to_owned(), |expected| expected.to_string())
    ));
    lines.push(format!("workers_spawned: {}", report.population.spawned));
    lines.push(format!("workers_retired: {}", report.population.retired));
    lines.push(format!("workers_peak_live: {}", report.population.peak_live));
    if report.population.lost > 0 {
        lines.push(format!("workers_lost: {}", report.population.lost));
    }
    lines.push(format!(
        "iterations_succeeded: {}",
        report.workers.iterations_succeeded
    ));
    lines.push(format!(
        "iterations_failed: {}",
        report.workers.iterations_failed
    ));
    lines.push(format!(
        "credential_failures: {}",
        report.workers.credential_failures
    ));
    lines
}
