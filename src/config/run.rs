use std::fmt;
use std::time::Duration;

use url::Url;

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ConfigError};
use crate::schedule::{Schedule, StageScheduler};
use crate::worker::WaitTime;

/// Basic-auth pair for the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a run needs, merged and validated once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: Url,
    pub max_iterations: u64,
    pub scheduler: StageScheduler,
    pub tick_interval: Duration,
    pub wait: WaitTime,
    pub credentials: ApiCredentials,
    pub token_path: String,
    pub task_path: String,
    pub request_timeout: Duration,
    pub run_timeout: Option<Duration>,
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns an error when a required value is missing or a value fails
    /// validation (schedule, ramp floor, wait range, host URL).
    pub fn from_args(args: &RunArgs) -> AppResult<Self> {
        let host = args
            .host
            .as_deref()
            .ok_or(ConfigError::MissingHost)?;
        let host = Url::parse(host).map_err(|err| ConfigError::InvalidHost {
            url: host.to_owned(),
            source: err,
        })?;

        let max_iterations = args.iterations.ok_or(ConfigError::MissingIterations)?;

        let credentials = match (args.username.as_ref(), args.password.as_ref()) {
            (Some(username), Some(password)) => ApiCredentials {
                username: username.clone(),
                password: password.clone(),
            },
            (Some(_), None) | (None, Some(_)) | (None, None) => {
                return Err(AppError::config(ConfigError::MissingCredentials));
            }
        };

        let stages = if args.stages.is_empty() {
            args.preset
                .map(|preset| preset.stages())
                .ok_or(ConfigError::MissingSchedule)?
        } else {
            args.stages.clone()
        };
        let scheduler = StageScheduler::new(Schedule::new(stages)?, args.ramp_floor)?;

        let wait = WaitTime::between(args.wait_min, args.wait_max)?;

        Ok(Self {
            host,
            max_iterations,
            scheduler,
            tick_interval: args.tick_interval,
            wait,
            credentials,
            token_path: args.token_path.clone(),
            task_path: args.task_path.clone(),
            request_timeout: args.request_timeout,
            run_timeout: args.run_timeout,
        })
    }
}
