//! ETA engine.
//!
//! Answers: "when will this shuttle reach its next stops?" Given a vehicle's
//! live position and its scheduled route, the engine picks the stops ahead,
//! flags stale fixes and off-route vehicles, and asks the routing client for
//! travel times. It holds no state between requests.

mod config;
mod engine;
mod error;
mod types;

pub use config::EtaConfig;
pub use engine::{EtaEngine, Selection, classify_stop, is_off_route, segment_progress, select_upcoming};
pub use error::EtaError;
pub use types::{
    CoordinateEta, SegmentProgress, StopStatus, Target, TargetEta, UpcomingEta, UpcomingStop,
};
