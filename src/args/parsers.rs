use std::time::Duration;

use crate::error::{AppError, AppResult, ScheduleError, ValidationError};
use crate::schedule::Stage;

/// Parses `<number>[ms|s|m|h]`; a bare number is seconds. Zero is allowed.
pub(crate) fn parse_duration_allow_zero(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        "h" => number
            .checked_mul(60)
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        _ => Err(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }),
    }
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_allow_zero(s)?;
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

pub(super) fn parse_wait_arg(s: &str) -> AppResult<Duration> {
    parse_duration_allow_zero(s).map_err(AppError::from)
}

/// Parses `DURATION:USERS`, e.g. `90s:2400` or `0:3600`.
pub(crate) fn parse_stage(s: &str) -> Result<Stage, ScheduleError> {
    let Some((duration, users)) = s.split_once(':') else {
        return Err(ScheduleError::InvalidStageFormat {
            value: s.to_owned(),
        });
    };
    let duration =
        parse_duration_allow_zero(duration).map_err(|err| ScheduleError::InvalidStageDuration {
            value: s.to_owned(),
            reason: err.to_string(),
        })?;
    let users = users
        .trim()
        .parse::<u64>()
        .map_err(|err| ScheduleError::InvalidStageUsers {
            value: s.to_owned(),
            source: err,
        })?;
    Ok(Stage::new(duration, users))
}

pub(super) fn parse_ramp_floor(s: &str) -> AppResult<f64> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|err| ValidationError::InvalidRampFloor {
            value: s.to_owned(),
            source: err,
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::schedule(ScheduleError::InvalidRampFloor { value }));
    }
    Ok(value)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" | "" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}
