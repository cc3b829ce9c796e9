use std::time::Duration;

use clap::Parser;

use crate::schedule::{DEFAULT_RAMP_FLOOR, Preset, Stage};

use super::defaults::{
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_TASK_PATH, DEFAULT_TICK_INTERVAL, DEFAULT_TOKEN_PATH,
    DEFAULT_WAIT_MAX, DEFAULT_WAIT_MIN,
};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_ramp_floor, parse_stage, parse_wait_arg,
};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Staged-ramp load generator - declarative concurrency stages, bounded per-worker iterations, and clean completion-driven shutdown."
)]
pub struct RunArgs {
    /// Path to config file (TOML/JSON). Defaults to ./swarmstage.toml or ./swarmstage.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Base URL of the target API (e.g. http://localhost:8000)
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Task iterations each worker performs before reporting completion
    #[arg(long, short = 'i', env = "USER_ITERATIONS")]
    pub iterations: Option<u64>,

    /// Schedule stage as DURATION:USERS, e.g. 90s:2400 (repeatable, in order)
    #[arg(long = "stage", short = 's', value_parser = parse_stage, conflicts_with = "preset")]
    pub stages: Vec<Stage>,

    /// Use a built-in schedule shape instead of explicit stages
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Minimum spawn/retire rate in workers per second for timed stages
    #[arg(long = "ramp-floor", default_value_t = DEFAULT_RAMP_FLOOR, value_parser = parse_ramp_floor)]
    pub ramp_floor: f64,

    /// How often the controller re-evaluates the schedule (supports ms/s/m/h)
    #[arg(long = "tick-interval", default_value = DEFAULT_TICK_INTERVAL, value_parser = parse_duration_arg)]
    pub tick_interval: Duration,

    /// Lower bound of the random wait between iterations (supports ms/s/m/h)
    #[arg(long = "wait-min", default_value = DEFAULT_WAIT_MIN, value_parser = parse_wait_arg)]
    pub wait_min: Duration,

    /// Upper bound of the random wait between iterations (supports ms/s/m/h)
    #[arg(long = "wait-max", default_value = DEFAULT_WAIT_MAX, value_parser = parse_wait_arg)]
    pub wait_max: Duration,

    /// Username for the token endpoint
    #[arg(long, env = "API_USERNAME")]
    pub username: Option<String>,

    /// Password for the token endpoint
    #[arg(long, env = "API_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Path of the token endpoint, relative to --host
    #[arg(long = "token-path", default_value = DEFAULT_TOKEN_PATH)]
    pub token_path: String,

    /// Path of the task endpoint, relative to --host
    #[arg(long = "task-path", default_value = DEFAULT_TASK_PATH)]
    pub task_path: String,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Abort the run if it has not stopped after this long (supports ms/s/m/h)
    #[arg(long = "run-timeout", value_parser = parse_duration_arg)]
    pub run_timeout: Option<Duration>,

    /// Enable verbose logging (sets log level to debug unless overridden by SWARMSTAGE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
