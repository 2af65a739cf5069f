//! ETA results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Coordinate, Profile, VehicleId};
use crate::registry::Station;
use crate::routing::{EtaSource, RouteEstimate};

/// Whether the vehicle is about to reach a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Arriving,
    Upcoming,
}

/// A stop ahead of the vehicle with its ETA. Built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingStop {
    pub station: Arc<Station>,
    pub eta_seconds: f64,
    pub distance_meters: f64,
    pub status: StopStatus,
    pub source: EtaSource,
}

impl UpcomingStop {
    pub fn new(station: Arc<Station>, estimate: RouteEstimate, status: StopStatus) -> Self {
        Self {
            station,
            eta_seconds: estimate.duration_seconds,
            distance_meters: estimate.distance_meters,
            status,
            source: estimate.source,
        }
    }
}

/// Progress along the route segment the vehicle is travelling.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentProgress {
    pub from_stop: Arc<Station>,
    pub to_stop: Arc<Station>,
    pub total_distance_meters: f64,
    pub remaining_distance_meters: f64,
    /// 0.0 at `from_stop`, 1.0 at `to_stop`.
    pub progress_ratio: f64,
}

/// ETAs to the stops ahead of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEta {
    pub vehicle_id: VehicleId,
    pub timestamp_utc: DateTime<Utc>,
    pub current_location: Coordinate,
    /// `None` when the schedule's endpoints match no registered route.
    pub route_id: Option<String>,
    pub direction: Option<String>,
    pub current_segment: Option<SegmentProgress>,
    pub upcoming_stops: Vec<UpcomingStop>,
    pub stale: bool,
    pub off_route: bool,
}

/// A caller-named destination for by-coordinates queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: String,
    pub location: Coordinate,
}

/// ETA to one caller-named destination.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEta {
    pub target: Target,
    pub eta_seconds: f64,
    pub distance_meters: f64,
    pub source: EtaSource,
}

/// ETAs from an explicit origin to caller-named destinations.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateEta {
    pub timestamp_utc: DateTime<Utc>,
    pub origin: Coordinate,
    pub mode: Profile,
    /// Input order preserved.
    pub targets: Vec<TargetEta>,
}
