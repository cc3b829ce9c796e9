use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Uniform random pause between two task iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    /// # Errors
    ///
    /// Returns [`ConfigError::WaitRangeInverted`] when `min > max`.
    pub fn between(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::WaitRangeInverted {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn constant(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::from_secs(1),
        }
    }
}
