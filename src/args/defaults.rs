/// Config filenames checked, in order, when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["swarmstage.toml", "swarmstage.json"];

pub(crate) const DEFAULT_TOKEN_PATH: &str = "/api/token";
pub(crate) const DEFAULT_TASK_PATH: &str = "/api/users";

pub(crate) const DEFAULT_TICK_INTERVAL: &str = "1s";
pub(crate) const DEFAULT_WAIT_MIN: &str = "0s";
pub(crate) const DEFAULT_WAIT_MAX: &str = "1s";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
