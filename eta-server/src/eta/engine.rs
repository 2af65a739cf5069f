//! Upcoming-stop selection and ETA assembly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{Coordinate, Position, Profile, Schedule, VehicleId};
use crate::fleet::FleetProvider;
use crate::geo;
use crate::registry::{Route, RouteRegistry, Station};
use crate::routing::{RouteEstimate, RoutingBackend, RoutingClient};

use super::config::EtaConfig;
use super::error::EtaError;
use super::types::{
    CoordinateEta, SegmentProgress, StopStatus, Target, TargetEta, UpcomingEta, UpcomingStop,
};

/// The stops ahead of a vehicle on its route.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'r> {
    /// Index of the stop nearest the vehicle.
    pub nearest: usize,

    /// Distance to that stop in metres.
    pub distance: f64,

    /// Stops from `nearest` onward, at most `max_stops` of them.
    pub stops: &'r [Arc<Station>],
}

/// Select the stops ahead of `position`.
///
/// The nearest stop by great-circle distance is taken as the current one;
/// everything from it to the end of the route is ahead. There is no memory
/// of stops already served, so a vehicle that loops back will see them
/// again. Returns `None` only for an empty stop list.
pub fn select_upcoming(
    position: Coordinate,
    stops: &[Arc<Station>],
    max_stops: usize,
) -> Option<Selection<'_>> {
    let (nearest, distance) = geo::nearest(position, stops, |s| s.location)?;
    let end = stops.len().min(nearest + max_stops);
    Some(Selection {
        nearest,
        distance,
        stops: &stops[nearest..end],
    })
}

/// Arriving strictly inside the threshold; exactly on it is still upcoming.
pub fn classify_stop(distance: f64, arriving_meters: f64) -> StopStatus {
    if distance < arriving_meters {
        StopStatus::Arriving
    } else {
        StopStatus::Upcoming
    }
}

/// Whether `position` is farther than `threshold` from every station.
///
/// With no stations at all nothing can be said, so the answer is `false`.
pub fn is_off_route(position: Coordinate, stations: &[Arc<Station>], threshold: f64) -> bool {
    geo::nearest(position, stations, |s| s.location).is_some_and(|(_, d)| d > threshold)
}

/// Progress between the stop before `nearest` and `nearest` itself.
pub fn segment_progress(
    position: Coordinate,
    route: &Route,
    nearest: usize,
) -> Option<SegmentProgress> {
    let from = route.stops.get(nearest.checked_sub(1)?)?;
    let to = route.stops.get(nearest)?;

    let total = geo::distance(from.location, to.location);
    if total <= 0.0 {
        return None;
    }
    let remaining = geo::distance(position, to.location);

    Some(SegmentProgress {
        from_stop: Arc::clone(from),
        to_stop: Arc::clone(to),
        total_distance_meters: total,
        remaining_distance_meters: remaining,
        progress_ratio: (1.0 - remaining / total).clamp(0.0, 1.0),
    })
}

/// ETA engine.
///
/// Borrows its collaborators for the duration of one request.
pub struct EtaEngine<'a, F, B> {
    fleet: &'a F,
    routing: &'a RoutingClient<B>,
    registry: &'a RouteRegistry,
    config: &'a EtaConfig,
}

impl<'a, F: FleetProvider, B: RoutingBackend> EtaEngine<'a, F, B> {
    /// Create a new engine.
    pub fn new(
        fleet: &'a F,
        routing: &'a RoutingClient<B>,
        registry: &'a RouteRegistry,
        config: &'a EtaConfig,
    ) -> Self {
        Self {
            fleet,
            routing,
            registry,
            config,
        }
    }

    /// ETAs to the next stops of `vehicle_id`'s scheduled route.
    pub async fn upcoming(
        &self,
        vehicle_id: VehicleId,
        profile: Profile,
        max_stops: Option<usize>,
    ) -> Result<UpcomingEta, EtaError> {
        self.upcoming_at(vehicle_id, profile, max_stops, Utc::now())
            .await
    }

    /// As [`upcoming`](Self::upcoming), with an explicit clock.
    pub async fn upcoming_at(
        &self,
        vehicle_id: VehicleId,
        profile: Profile,
        max_stops: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<UpcomingEta, EtaError> {
        let max_stops = self.validate_max_stops(max_stops)?;

        let (vehicle, schedule) = futures::try_join!(
            self.fleet.vehicle(vehicle_id),
            self.fleet.active_schedule(vehicle_id)
        )?;

        if !vehicle.active {
            debug!(%vehicle_id, "vehicle is inactive");
            return Err(EtaError::NotAvailable);
        }
        let Some(schedule) = schedule else {
            debug!(%vehicle_id, "vehicle has no active schedule");
            return Err(EtaError::NotAvailable);
        };

        let position = self.fleet.current_position(vehicle_id).await?;

        Ok(self
            .assemble(vehicle_id, &schedule, &position, profile, max_stops, now)
            .await)
    }

    /// Build the upcoming-stop answer for a known position and schedule.
    ///
    /// Never fails: routing failures become fallback estimates, and an
    /// unknown route yields an empty stop list.
    pub async fn assemble(
        &self,
        vehicle_id: VehicleId,
        schedule: &Schedule,
        position: &Position,
        profile: Profile,
        max_stops: usize,
        now: DateTime<Utc>,
    ) -> UpcomingEta {
        let here = position.location;
        let stale = position.is_stale(now, self.config.stale_after());
        let off_route = is_off_route(
            here,
            self.registry.all_stations(),
            self.config.off_route_meters,
        );

        let route = self
            .registry
            .resolve(&schedule.from_location, &schedule.to_location);

        let mut result = UpcomingEta {
            vehicle_id,
            timestamp_utc: now,
            current_location: here,
            route_id: None,
            direction: None,
            current_segment: None,
            upcoming_stops: Vec::new(),
            stale,
            off_route,
        };

        let Some(route) = route else {
            debug!(
                %vehicle_id,
                from = %schedule.from_location,
                to = %schedule.to_location,
                "schedule matches no registered route"
            );
            return result;
        };

        result.route_id = Some(route.route_id.clone());
        result.direction = Some(route.direction.clone());

        let Some(selection) = select_upcoming(here, &route.stops, max_stops) else {
            return result;
        };

        if !off_route {
            result.current_segment = segment_progress(here, route, selection.nearest);
        }

        let destinations: Vec<Coordinate> =
            selection.stops.iter().map(|s| s.location).collect();
        let estimates = self.estimate(here, &destinations, profile).await;

        result.upcoming_stops = selection
            .stops
            .iter()
            .zip(estimates)
            .enumerate()
            .map(|(i, (station, estimate))| {
                let status = if i == 0 {
                    classify_stop(selection.distance, self.config.arriving_meters)
                } else {
                    StopStatus::Upcoming
                };
                UpcomingStop::new(Arc::clone(station), estimate, status)
            })
            .collect();

        result
    }

    /// ETAs from an explicit origin to caller-named targets.
    pub async fn by_coordinates(
        &self,
        origin: Coordinate,
        targets: Vec<Target>,
        profile: Profile,
    ) -> Result<CoordinateEta, EtaError> {
        let limit = self.config.max_stops_limit;
        if targets.is_empty() {
            return Err(EtaError::InvalidRequest(
                "at least one target is required".to_string(),
            ));
        }
        if targets.len() > limit {
            return Err(EtaError::InvalidRequest(format!(
                "at most {limit} targets are allowed"
            )));
        }

        let destinations: Vec<Coordinate> = targets.iter().map(|t| t.location).collect();
        let estimates = self.estimate(origin, &destinations, profile).await;

        let targets = targets
            .into_iter()
            .zip(estimates)
            .map(|(target, estimate)| TargetEta {
                target,
                eta_seconds: estimate.duration_seconds,
                distance_meters: estimate.distance_meters,
                source: estimate.source,
            })
            .collect();

        Ok(CoordinateEta {
            timestamp_utc: Utc::now(),
            origin,
            mode: profile,
            targets,
        })
    }

    fn validate_max_stops(&self, max_stops: Option<usize>) -> Result<usize, EtaError> {
        let limit = self.config.max_stops_limit;
        match max_stops.unwrap_or(self.config.default_max_stops) {
            n @ 1.. if n <= limit => Ok(n),
            n => Err(EtaError::InvalidRequest(format!(
                "max_stops must be between 1 and {limit}, got {n}"
            ))),
        }
    }

    /// One `route` call for a single destination, one `table` call otherwise.
    async fn estimate(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> Vec<RouteEstimate> {
        match destinations {
            [] => Vec::new(),
            [single] => vec![self.routing.route(origin, *single, profile).await],
            many => self
                .routing
                .table(origin, many, profile)
                .await
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
