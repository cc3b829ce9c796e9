use std::time::Duration;

use crate::error::ScheduleError;

/// A time window with a target number of concurrently active workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration: Duration,
    pub users: u64,
}

impl Stage {
    #[must_use]
    pub const fn new(duration: Duration, users: u64) -> Self {
        Self { duration, users }
    }

    #[must_use]
    pub const fn from_secs(secs: u64, users: u64) -> Self {
        Self::new(Duration::from_secs(secs), users)
    }
}

/// Where a given elapsed time falls inside a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePosition {
    InStage(usize),
    PastEnd,
}

/// Ordered, validated, non-empty list of stages.
///
/// Stage order is time order. A schedule can only be obtained through
/// [`Schedule::new`], so holders never see an empty list or a first stage
/// with zero duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    stages: Vec<Stage>,
}

impl Schedule {
    /// Validates and wraps a stage list.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Empty`] for an empty list and
    /// [`ScheduleError::FirstStageZeroDuration`] when the first stage would
    /// need an infinite ramp rate.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ScheduleError> {
        let first = stages.first().ok_or(ScheduleError::Empty)?;
        if first.duration.is_zero() {
            return Err(ScheduleError::FirstStageZeroDuration);
        }
        Ok(Self { stages })
    }

    #[must_use]
    pub const fn stages(&self) -> &[Stage] {
        self.stages.as_slice()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.stages
            .iter()
            .fold(Duration::ZERO, |total, stage| total.saturating_add(stage.duration))
    }

    #[must_use]
    pub fn peak_users(&self) -> u64 {
        self.stages.iter().map(|stage| stage.users).max().unwrap_or(0)
    }

    /// Stage index `i` such that the cumulative duration before `i` is
    /// `<= elapsed` and the cumulative duration through `i` is `> elapsed`.
    /// Zero-duration stages never contain a point in time.
    #[must_use]
    pub fn position(&self, elapsed: Duration) -> SchedulePosition {
        let mut cumulative = Duration::ZERO;
        for (index, stage) in self.stages.iter().enumerate() {
            cumulative = cumulative.saturating_add(stage.duration);
            if elapsed < cumulative {
                return SchedulePosition::InStage(index);
            }
        }
        SchedulePosition::PastEnd
    }
}
