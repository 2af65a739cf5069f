//! Travel profile (routing mode).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown profile name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel profile: {0} (expected \"driving\" or \"walking\")")]
pub struct InvalidProfile(String);

/// Travel mode used for duration estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Driving,
    Walking,
}

impl Profile {
    /// Profile name as used in routing-engine URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Driving => "driving",
            Profile::Walking => "walking",
        }
    }

    /// Average speed in metres per second for straight-line estimates.
    ///
    /// Driving is ~50 km/h, walking ~5 km/h.
    pub fn average_speed(&self) -> f64 {
        match self {
            Profile::Driving => 13.89,
            Profile::Walking => 1.39,
        }
    }
}

impl FromStr for Profile {
    type Err = InvalidProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Profile::Driving),
            "walking" => Ok(Profile::Walking),
            _ => Err(InvalidProfile(s.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
