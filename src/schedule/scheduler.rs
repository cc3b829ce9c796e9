use std::time::Duration;

use crate::error::ScheduleError;

use super::types::{Schedule, Stage};

/// Lowest spawn rate (workers per second) handed out for a timed stage.
pub const DEFAULT_RAMP_FLOOR: f64 = 10.0;

/// Control signal for one tick: how many workers should be live and how fast
/// to move toward that number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampTarget {
    pub users: u64,
    /// Workers per second.
    pub rate: f64,
}

/// Turns elapsed run time into a [`RampTarget`].
///
/// Every timed stage is a linear ramp from the previous stage's target to
/// its own over its own duration. A zero-duration stage is an instantaneous
/// jump: once the walk reaches it, it answers with its target as the rate.
#[derive(Debug, Clone)]
pub struct StageScheduler {
    schedule: Schedule,
    floor: f64,
}

impl StageScheduler {
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidRampFloor`] when `floor` is negative,
    /// NaN, or infinite.
    pub fn new(schedule: Schedule, floor: f64) -> Result<Self, ScheduleError> {
        if !floor.is_finite() || floor < 0.0 {
            return Err(ScheduleError::InvalidRampFloor { value: floor });
        }
        Ok(Self { schedule, floor })
    }

    #[must_use]
    pub const fn with_default_floor(schedule: Schedule) -> Self {
        Self {
            schedule,
            floor: DEFAULT_RAMP_FLOOR,
        }
    }

    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[must_use]
    pub const fn floor(&self) -> f64 {
        self.floor
    }

    /// Returns `None` once `elapsed` is past the end of the schedule.
    #[must_use]
    pub fn tick(&self, elapsed: Duration) -> Option<RampTarget> {
        let mut cumulative = Duration::ZERO;
        let mut previous: Option<&Stage> = None;

        for stage in self.schedule.stages() {
            cumulative = cumulative.saturating_add(stage.duration);
            if elapsed < cumulative {
                let rate = match previous {
                    None => per_second(stage.users, stage.duration),
                    Some(prev) if prev.users == stage.users => 0.0,
                    Some(prev) => per_second(prev.users.abs_diff(stage.users), stage.duration),
                };
                return Some(RampTarget {
                    users: stage.users,
                    rate: rate.max(self.floor),
                });
            }
            if stage.duration.is_zero() {
                return Some(RampTarget {
                    users: stage.users,
                    rate: stage.users as f64,
                });
            }
            previous = Some(stage);
        }

        None
    }
}

const fn per_second(users: u64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs <= 0.0 {
        return users as f64;
    }
    users as f64 / secs
}
