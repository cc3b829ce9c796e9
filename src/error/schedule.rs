use thiserror::Error;

/// Rejections raised while building a [`crate::schedule::Schedule`].
///
/// Every variant is fatal: a run never starts with an invalid schedule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Schedule must contain at least one stage.")]
    Empty,
    #[error("The first stage must have a duration > 0 (it ramps from zero users).")]
    FirstStageZeroDuration,
    #[error("Ramp floor must be a finite value >= 0 (got {value}).")]
    InvalidRampFloor { value: f64 },
    #[error("Invalid stage '{value}'. Expected 'DURATION:USERS' (e.g. 90s:2400).")]
    InvalidStageFormat { value: String },
    #[error("Invalid stage users in '{value}': {source}")]
    InvalidStageUsers {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid stage duration in '{value}': {reason}")]
    InvalidStageDuration { value: String, reason: String },
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
