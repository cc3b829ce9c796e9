//! Declarative stage schedules and the ramp scheduler that plays them.
mod presets;
mod scheduler;
mod types;


pub use presets::Preset;
pub use scheduler::{DEFAULT_RAMP_FLOOR, RampTarget, StageScheduler};
pub use types::{Schedule, SchedulePosition, Stage};
