//! Data transfer objects for web requests and responses.
//!
//! Durations and distances go out as whole seconds and whole metres.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Profile};
use crate::eta::{CoordinateEta, SegmentProgress, StopStatus, UpcomingEta, UpcomingStop};
use crate::registry::{Route, Station};
use crate::routing::EtaSource;

fn whole(x: f64) -> i64 {
    x.round() as i64
}

/// Query for `/api/client/eta/upcoming`.
#[derive(Debug, Deserialize)]
pub struct UpcomingEtaRequest {
    pub vehicle_id: u32,

    /// "driving" (default) or "walking"
    pub mode: Option<String>,

    /// 1 to 10, default 2
    pub max_stops: Option<usize>,
}

/// A stop ahead of the vehicle.
#[derive(Debug, Serialize)]
pub struct StopEtaResult {
    pub stop_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub eta_seconds: i64,
    pub distance_meters: i64,
    pub status: StopStatus,
    pub source: EtaSource,
}

impl StopEtaResult {
    pub fn from_stop(stop: &UpcomingStop) -> Self {
        Self {
            stop_id: stop.station.id.clone(),
            name: stop.station.name.clone(),
            lat: stop.station.location.lat(),
            lon: stop.station.location.lon(),
            eta_seconds: whole(stop.eta_seconds),
            distance_meters: whole(stop.distance_meters),
            status: stop.status,
            source: stop.source,
        }
    }
}

/// A stop at either end of the current segment.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl StopResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            stop_id: station.id.clone(),
            name: station.name.clone(),
            lat: station.location.lat(),
            lon: station.location.lon(),
        }
    }
}

/// The segment the vehicle is travelling.
///
/// Distances keep their fractional metres; clients draw progress from them.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub from_stop: StopResult,
    pub to_stop: StopResult,
    pub total_distance_meters: f64,
    pub remaining_distance_meters: f64,
    pub progress_ratio: f64,
}

impl SegmentResult {
    pub fn from_segment(segment: &SegmentProgress) -> Self {
        Self {
            from_stop: StopResult::from_station(&segment.from_stop),
            to_stop: StopResult::from_station(&segment.to_stop),
            total_distance_meters: segment.total_distance_meters,
            remaining_distance_meters: segment.remaining_distance_meters,
            // Three decimals is plenty for a progress bar.
            progress_ratio: (segment.progress_ratio * 1000.0).round() / 1000.0,
        }
    }
}

/// Response for `/api/client/eta/upcoming`.
#[derive(Debug, Serialize)]
pub struct UpcomingEtaResponse {
    pub vehicle_id: u32,
    pub timestamp_utc: DateTime<Utc>,
    pub current_location: Coordinate,
    pub route_id: Option<String>,
    pub direction: Option<String>,
    pub current_segment: Option<SegmentResult>,
    pub upcoming_stops: Vec<StopEtaResult>,
    pub stale: bool,
    pub off_route: bool,
}

impl UpcomingEtaResponse {
    pub fn from_eta(eta: &UpcomingEta) -> Self {
        Self {
            vehicle_id: eta.vehicle_id.0,
            timestamp_utc: eta.timestamp_utc,
            current_location: eta.current_location,
            route_id: eta.route_id.clone(),
            direction: eta.direction.clone(),
            current_segment: eta.current_segment.as_ref().map(SegmentResult::from_segment),
            upcoming_stops: eta
                .upcoming_stops
                .iter()
                .map(StopEtaResult::from_stop)
                .collect(),
            stale: eta.stale,
            off_route: eta.off_route,
        }
    }
}

/// A bare latitude/longitude pair as sent by clients.
///
/// Not validated on parse, so range errors come back as our own 400.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// A named destination in a by-coordinates request.
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

/// Body for `/api/client/eta/by-coordinates`.
#[derive(Debug, Deserialize)]
pub struct CoordinateEtaRequest {
    pub origin: LatLon,
    pub targets: Vec<TargetRequest>,
    pub mode: Option<String>,
}

/// ETA to one named destination.
#[derive(Debug, Serialize)]
pub struct TargetEtaResult {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub eta_seconds: i64,
    pub distance_meters: i64,
    pub source: EtaSource,
}

/// Response for `/api/client/eta/by-coordinates`.
#[derive(Debug, Serialize)]
pub struct CoordinateEtaResponse {
    pub timestamp_utc: DateTime<Utc>,
    pub origin: Coordinate,
    pub mode: Profile,
    pub targets: Vec<TargetEtaResult>,
}

impl CoordinateEtaResponse {
    pub fn from_eta(eta: CoordinateEta) -> Self {
        Self {
            timestamp_utc: eta.timestamp_utc,
            origin: eta.origin,
            mode: eta.mode,
            targets: eta
                .targets
                .into_iter()
                .map(|t| TargetEtaResult {
                    lat: t.target.location.lat(),
                    lon: t.target.location.lon(),
                    id: t.target.id,
                    eta_seconds: whole(t.eta_seconds),
                    distance_meters: whole(t.distance_meters),
                    source: t.source,
                })
                .collect(),
        }
    }
}

/// A station on a route.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl StationResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            lat: station.location.lat(),
            lon: station.location.lon(),
        }
    }
}

/// A route in the route list.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub route_id: String,
    pub route_name: String,
    pub from_location: String,
    pub to_location: String,
    pub stop_count: usize,
}

impl RouteSummary {
    pub fn from_route(route: &Route) -> Self {
        Self {
            route_id: route.route_id.clone(),
            route_name: route.direction.clone(),
            from_location: route.from_location.clone(),
            to_location: route.to_location.clone(),
            stop_count: route.stops.len(),
        }
    }
}

/// Response for `/api/client/routes`.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteSummary>,
}

/// Response for `/api/client/routes/{route_id}/stops`.
#[derive(Debug, Serialize)]
pub struct RouteStopsResponse {
    pub route_id: String,
    pub route_name: String,
    pub from_location: String,
    pub to_location: String,
    pub stops: Vec<StationResult>,
}

impl RouteStopsResponse {
    pub fn from_route(route: &Route) -> Self {
        Self {
            route_id: route.route_id.clone(),
            route_name: route.direction.clone(),
            from_location: route.from_location.clone(),
            to_location: route.to_location.clone(),
            stops: route
                .stops
                .iter()
                .map(|s| StationResult::from_station(s))
                .collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
