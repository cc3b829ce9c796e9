use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config cannot set both '{left}' and '{right}'.")]
    Conflict {
        left: &'static str,
        right: &'static str,
    },
    #[error("Stage {index} has an invalid duration: {reason}")]
    InvalidStageDuration { index: usize, reason: String },
    #[error("Invalid '{field}' duration: {reason}")]
    InvalidDuration { field: &'static str, reason: String },
    #[error("Missing host (set --host or provide in config).")]
    MissingHost,
    #[error("Missing iterations (set --iterations, USER_ITERATIONS, or provide in config).")]
    MissingIterations,
    #[error("Missing API credentials (set --username/--password or API_USERNAME/API_PASSWORD).")]
    MissingCredentials,
    #[error("No schedule configured (use --stage, --preset, or [[stages]] in config).")]
    MissingSchedule,
    #[error("wait_min ({min_ms}ms) must be <= wait_max ({max_ms}ms).")]
    WaitRangeInverted { min_ms: u128, max_ms: u128 },
    #[error("Invalid host '{url}': {source}")]
    InvalidHost {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
