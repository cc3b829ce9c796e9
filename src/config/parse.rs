use std::time::Duration;

use crate::args::parse_duration_allow_zero;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::schedule::Stage;

use super::types::{DurationValue, StageConfig};

impl DurationValue {
    /// Zero is a valid result; callers that need a positive value check it.
    ///
    /// # Errors
    ///
    /// Returns an error when the text form is not `<number>[ms|s|m|h]`.
    pub fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_allow_zero(text),
        }
    }
}

pub(super) fn positive_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    let duration = any_duration(value, field)?;
    if duration.is_zero() {
        return Err(AppError::config(ConfigError::InvalidDuration {
            field,
            reason: ValidationError::DurationZero.to_string(),
        }));
    }
    Ok(duration)
}

pub(super) fn any_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field,
            reason: err.to_string(),
        })
    })
}

pub(super) fn stages_from_config(stages: &[StageConfig]) -> AppResult<Vec<Stage>> {
    let mut parsed = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        let duration = stage.duration.to_duration().map_err(|err| {
            AppError::config(ConfigError::InvalidStageDuration {
                index,
                reason: err.to_string(),
            })
        })?;
        parsed.push(Stage::new(duration, stage.users));
    }
    Ok(parsed)
}
