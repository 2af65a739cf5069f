//! Point-in-time vehicle position snapshot.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Coordinate;

/// A GPS fix reported by a vehicle's tracking device.
///
/// Positions are never mutated; a newer fetch supersedes an older one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub location: Coordinate,

    /// When the device captured this fix (UTC).
    pub captured_at: DateTime<Utc>,

    /// Ground speed as reported by the device (km/h).
    pub speed: f64,

    /// Device-reported validity of the fix.
    pub valid: bool,
}

impl Position {
    pub fn new(location: Coordinate, captured_at: DateTime<Utc>) -> Self {
        Self {
            location,
            captured_at,
            speed: 0.0,
            valid: true,
        }
    }

    /// Age of the fix relative to `now`. Negative if the device clock is ahead.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.captured_at
    }

    /// Whether the fix is older than `threshold`. An age of exactly
    /// `threshold` is not stale.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.age(now) > threshold
    }
}
