use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ConfigError};

use super::parse::{any_duration, positive_duration, stages_from_config};
use super::types::ConfigFile;

/// A value the user gave on the command line or through its env variable.
fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

/// Applies configuration values to CLI arguments.
///
/// Values the user set explicitly are kept; everything else is taken from
/// the file when present. An explicit `--stage` or `--preset` replaces the
/// file's whole schedule.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each
/// other.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if config.stages.is_some() && config.preset.is_some() {
        return Err(AppError::config(ConfigError::Conflict {
            left: "stages",
            right: "preset",
        }));
    }

    if !is_explicit(matches, "stages") && !is_explicit(matches, "preset") {
        if let Some(stages) = config.stages.as_ref() {
            args.stages = stages_from_config(stages)?;
            args.preset = None;
        } else if let Some(preset) = config.preset {
            args.stages.clear();
            args.preset = Some(preset);
        }
    }

    if !is_explicit(matches, "host")
        && let Some(host) = config.host.clone()
    {
        args.host = Some(host);
    }

    if !is_explicit(matches, "iterations")
        && let Some(iterations) = config.iterations
    {
        args.iterations = Some(iterations);
    }

    if !is_explicit(matches, "ramp_floor")
        && let Some(floor) = config.ramp_floor
    {
        args.ramp_floor = floor;
    }

    if !is_explicit(matches, "tick_interval")
        && let Some(value) = config.tick_interval.as_ref()
    {
        args.tick_interval = positive_duration(value, "tick_interval")?;
    }

    if !is_explicit(matches, "wait_min")
        && let Some(value) = config.wait_min.as_ref()
    {
        args.wait_min = any_duration(value, "wait_min")?;
    }

    if !is_explicit(matches, "wait_max")
        && let Some(value) = config.wait_max.as_ref()
    {
        args.wait_max = any_duration(value, "wait_max")?;
    }

    if !is_explicit(matches, "username")
        && let Some(username) = config.username.clone()
    {
        args.username = Some(username);
    }

    if !is_explicit(matches, "password")
        && let Some(password) = config.password.clone()
    {
        args.password = Some(password);
    }

    if !is_explicit(matches, "token_path")
        && let Some(path) = config.token_path.clone()
    {
        args.token_path = path;
    }

    if !is_explicit(matches, "task_path")
        && let Some(path) = config.task_path.clone()
    {
        args.task_path = path;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.request_timeout.as_ref()
    {
        args.request_timeout = positive_duration(value, "request_timeout")?;
    }

    if !is_explicit(matches, "run_timeout")
        && let Some(value) = config.run_timeout.as_ref()
    {
        args.run_timeout = Some(positive_duration(value, "run_timeout")?);
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}
