use clap::ValueEnum;
use serde::Deserialize;

use super::types::Stage;

/// Named stage lists for the classic test shapes.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Ramp to 2400 users, hold, ramp down to zero.
    Load,
    /// Quick ramp to 2200 users, hold for ten minutes.
    Soak,
    /// Hold 2000 users with two short bursts to 3600.
    Spike,
    /// Ramp to 3600 users over five minutes.
    Stress,
}

impl Preset {
    #[must_use]
    pub fn stages(self) -> Vec<Stage> {
        match self {
            Preset::Load => vec![
                Stage::from_secs(90, 2400),
                Stage::from_secs(120, 2400),
                Stage::from_secs(90, 0),
            ],
            Preset::Soak => vec![Stage::from_secs(10, 2200), Stage::from_secs(600, 2200)],
            Preset::Spike => vec![
                Stage::from_secs(10, 2000),
                Stage::from_secs(90, 2000),
                Stage::from_secs(3, 3600),
                Stage::from_secs(3, 2000),
                Stage::from_secs(120, 2000),
                Stage::from_secs(3, 3600),
                Stage::from_secs(3, 2000),
                Stage::from_secs(90, 2000),
            ],
            Preset::Stress => vec![Stage::from_secs(300, 3600)],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Preset::Load => "load",
            Preset::Soak => "soak",
            Preset::Spike => "spike",
            Preset::Stress => "stress",
        }
    }
}
