mod app;
mod config;
mod schedule;
mod task;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use schedule::ScheduleError;
pub use task::TaskError;
pub use validation::ValidationError;
