use serde::Deserialize;

use crate::schedule::Preset;

/// On-disk configuration. Every field is optional; explicit CLI values win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    #[serde(alias = "user_iterations")]
    pub iterations: Option<u64>,
    pub stages: Option<Vec<StageConfig>>,
    pub preset: Option<Preset>,
    pub ramp_floor: Option<f64>,
    pub tick_interval: Option<DurationValue>,
    pub wait_min: Option<DurationValue>,
    pub wait_max: Option<DurationValue>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token_path: Option<String>,
    pub task_path: Option<String>,
    pub request_timeout: Option<DurationValue>,
    pub run_timeout: Option<DurationValue>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub duration: DurationValue,
    #[serde(alias = "target")]
    pub users: u64,
}

/// A duration written either as whole seconds or as text with a unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}
