//! Thresholds and limits for ETA computation.

use chrono::Duration;

/// Configuration parameters for the ETA engine.
#[derive(Debug, Clone)]
pub struct EtaConfig {
    /// A position older than this is flagged stale (seconds).
    pub stale_after_secs: i64,

    /// A vehicle farther than this from every station is off-route (metres).
    pub off_route_meters: f64,

    /// The nearest stop is "arriving" when closer than this (metres).
    pub arriving_meters: f64,

    /// Upcoming stops returned when the caller does not say.
    pub default_max_stops: usize,

    /// Hard ceiling on upcoming stops and on by-coordinates targets.
    pub max_stops_limit: usize,
}

impl EtaConfig {
    /// Returns the staleness threshold as a Duration.
    pub fn stale_after(&self) -> Duration {
        Duration::seconds(self.stale_after_secs)
    }
}

impl Default for EtaConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: 60,
            off_route_meters: 500.0,
            arriving_meters: 100.0,
            default_max_stops: 2,
            max_stops_limit: 10,
        }
    }
}
