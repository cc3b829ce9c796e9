use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{Instrument, debug, error, info_span};

use crate::args::{DEFAULT_CONFIG_FILES, RunArgs};
use crate::config::{RunConfig, apply_config, load_config};
use crate::controller::{Controller, WorkerPlan};
use crate::error::AppResult;
use crate::shutdown::StopSignal;
use crate::system::logger::init_logging;
use crate::system::run_id::build_run_id;
use crate::system::shutdown_handlers::{setup_run_timeout, setup_signal_shutdown_handler};
use crate::system::{selection_lines, summary_lines};
use crate::task::http::{HttpTaskExecutor, HttpTokenAuthenticator, build_client, join_url};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    let config = RunConfig::from_args(&args).inspect_err(|err| error!("{}", err))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(config))
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(config: RunConfig) -> AppResult<()> {
    let run_id = build_run_id();
    let span = info_span!("run", id = %run_id);
    execute_run(config, &run_id).instrument(span).await
}

async fn execute_run(config: RunConfig, run_id: &str) -> AppResult<()> {
    let started_at = Local::now();
    for line in selection_lines(&config) {
        debug!("{}", line);
    }

    let client = build_client(config.request_timeout)?;
    let token_url = join_url(&config.host, &config.token_path)?;
    let task_url = join_url(&config.host, &config.task_path)?;
    let plan = WorkerPlan {
        authenticator: Arc::new(HttpTokenAuthenticator::new(
            client.clone(),
            token_url,
            &config.credentials.username,
            &config.credentials.password,
        )),
        executor: Arc::new(HttpTaskExecutor::new(client, task_url)),
        max_iterations: config.max_iterations,
        wait: config.wait,
    };

    let stop = StopSignal::new();
    let signal_handle = setup_signal_shutdown_handler(&stop);
    let timeout_handle = config
        .run_timeout
        .map(|timeout| setup_run_timeout(&stop, timeout));

    let controller = Controller::new(config.scheduler, plan, stop, config.tick_interval);
    let report = controller.run().await;

    signal_handle.await?;
    if let Some(handle) = timeout_handle {
        handle.await?;
    }

    for line in summary_lines(&report, run_id, started_at) {
        println!("{}", line);
    }
    Ok(())
}
