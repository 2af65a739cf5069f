//! Scenario tests for upcoming-stop selection and ETA assembly.

use super::*;
use crate::cache::CacheConfig;
use crate::domain::{Position, Schedule, Vehicle};
use crate::fleet::FleetError;
use crate::osrm::{Leg, OsrmError};
use crate::registry::campus_routes;
use crate::routing::{EtaSource, fallback_estimate};
use chrono::{Duration, TimeZone};
use std::sync::Mutex;

const SHUTTLE: VehicleId = VehicleId(1);

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 8, 30, 0).unwrap()
}

fn campus() -> Coordinate {
    coord(18.525778, 73.733243)
}

fn bavdhan() -> Coordinate {
    coord(18.518468, 73.765785)
}

fn vanaz() -> Coordinate {
    coord(18.507034, 73.805283)
}

fn fc_road() -> Coordinate {
    coord(18.522335, 73.843739)
}

fn ids(stops: &[UpcomingStop]) -> Vec<&str> {
    stops.iter().map(|s| s.station.id.as_str()).collect()
}

/// Fleet with at most one vehicle, answering from fixed data.
struct MockFleet {
    vehicle: Option<Vehicle>,
    schedule: Option<Schedule>,
    position: Result<Position, FleetError>,
    position_calls: Mutex<usize>,
}

impl MockFleet {
    /// Active shuttle on Campus → FC Road, fixed at `location` right now.
    fn at(location: Coordinate) -> Self {
        Self {
            vehicle: Some(Vehicle {
                id: SHUTTLE,
                label: "Shuttle 1".to_string(),
                active: true,
            }),
            schedule: Some(Schedule {
                vehicle_id: SHUTTLE,
                from_location: "Campus".to_string(),
                to_location: "FC Road".to_string(),
                active: true,
            }),
            position: Ok(Position::new(location, now())),
            position_calls: Mutex::new(0),
        }
    }

    fn with_schedule(mut self, from: &str, to: &str) -> Self {
        if let Some(schedule) = &mut self.schedule {
            schedule.from_location = from.to_string();
            schedule.to_location = to.to_string();
        }
        self
    }

    fn captured(mut self, captured_at: DateTime<Utc>) -> Self {
        if let Ok(position) = &mut self.position {
            position.captured_at = captured_at;
        }
        self
    }

    fn position_calls(&self) -> usize {
        *self.position_calls.lock().unwrap()
    }
}

impl FleetProvider for MockFleet {
    async fn vehicle(&self, id: VehicleId) -> Result<Vehicle, FleetError> {
        self.vehicle
            .clone()
            .filter(|v| v.id == id)
            .ok_or(FleetError::NotFound(id))
    }

    async fn active_schedule(&self, id: VehicleId) -> Result<Option<Schedule>, FleetError> {
        Ok(self
            .schedule
            .clone()
            .filter(|s| s.vehicle_id == id && s.active))
    }

    async fn current_position(&self, _id: VehicleId) -> Result<Position, FleetError> {
        *self.position_calls.lock().unwrap() += 1;
        self.position.clone()
    }
}

/// Routing backend that counts calls and either answers or fails.
struct CountingBackend {
    fail: bool,
    /// Answer tables with one cell fewer than asked.
    short_rows: bool,
    route_calls: Mutex<usize>,
    table_calls: Mutex<usize>,
}

impl CountingBackend {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            short_rows: false,
            route_calls: Mutex::new(0),
            table_calls: Mutex::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            short_rows: false,
            route_calls: Mutex::new(0),
            table_calls: Mutex::new(0),
        })
    }

    fn short_rows() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            short_rows: true,
            route_calls: Mutex::new(0),
            table_calls: Mutex::new(0),
        })
    }

    fn route_calls(&self) -> usize {
        *self.route_calls.lock().unwrap()
    }

    fn table_calls(&self) -> usize {
        *self.table_calls.lock().unwrap()
    }

    fn down() -> OsrmError {
        OsrmError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        }
    }
}

fn road_leg(origin: Coordinate, destination: Coordinate) -> Leg {
    let distance = (geo::distance(origin, destination) * 1.4).round();
    Leg {
        duration: (distance / 9.0).round(),
        distance,
    }
}

impl RoutingBackend for Arc<CountingBackend> {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        _profile: Profile,
    ) -> Result<Leg, OsrmError> {
        *self.route_calls.lock().unwrap() += 1;
        if self.fail {
            return Err(CountingBackend::down());
        }
        Ok(road_leg(origin, destination))
    }

    async fn fetch_table(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        _profile: Profile,
    ) -> Result<Vec<Option<Leg>>, OsrmError> {
        *self.table_calls.lock().unwrap() += 1;
        if self.fail {
            return Err(CountingBackend::down());
        }
        let keep = if self.short_rows {
            destinations.len().saturating_sub(1)
        } else {
            destinations.len()
        };
        Ok(destinations[..keep]
            .iter()
            .map(|&d| Some(road_leg(origin, d)))
            .collect())
    }
}

fn routing(backend: &Arc<CountingBackend>) -> RoutingClient<Arc<CountingBackend>> {
    RoutingClient::new(backend.clone(), &CacheConfig::default())
}

#[tokio::test]
async fn nearest_stop_starts_the_upcoming_set() {
    let fleet = MockFleet::at(coord(18.5230, 73.7600));
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert_eq!(eta.route_id.as_deref(), Some("campus-fcroad"));
    assert_eq!(eta.direction.as_deref(), Some("Campus → FC Road"));
    assert_eq!(ids(&eta.upcoming_stops), ["bavdhan-guard-post", "vanaz-station"]);
    assert!(eta
        .upcoming_stops
        .iter()
        .all(|s| s.status == StopStatus::Upcoming && s.source == EtaSource::RoutingEngine));
    assert_eq!(eta.vehicle_id, SHUTTLE);
    assert_eq!(eta.timestamp_utc, now());
    assert!(!eta.stale);

    // Two stops, one matrix request.
    assert_eq!(backend.table_calls(), 1);
    assert_eq!(backend.route_calls(), 0);
}

#[tokio::test]
async fn scenario_origin_is_off_route() {
    // About 790 m from Bavdhan, the closest station.
    let fleet = MockFleet::at(coord(18.5230, 73.7600));
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert!(eta.off_route);
    assert!(eta.current_segment.is_none());
    assert!(!eta.upcoming_stops.is_empty());
}

#[tokio::test]
async fn max_stops_above_ceiling_is_rejected() {
    let fleet = MockFleet::at(bavdhan());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);

    for bad in [0, 11] {
        let err = engine
            .upcoming_at(SHUTTLE, Profile::Driving, Some(bad), now())
            .await
            .unwrap_err();
        assert!(matches!(err, EtaError::InvalidRequest(_)), "{bad}: {err:?}");
    }

    // Rejected before any collaborator is asked.
    assert_eq!(fleet.position_calls(), 0);
    assert_eq!(backend.table_calls() + backend.route_calls(), 0);
}

#[tokio::test]
async fn max_stops_ceiling_is_accepted() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, Some(10), now())
        .await
        .unwrap();

    // Only four stops exist.
    assert_eq!(
        ids(&eta.upcoming_stops),
        ["campus", "bavdhan-guard-post", "vanaz-station", "fc-road"]
    );
    assert_eq!(backend.table_calls(), 1);
}

#[tokio::test]
async fn routing_failure_falls_back_for_every_stop() {
    let fleet = MockFleet::at(vanaz());
    let backend = CountingBackend::failing();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Walking, Some(3), now())
        .await
        .unwrap();

    assert_eq!(ids(&eta.upcoming_stops), ["vanaz-station", "fc-road"]);
    for stop in &eta.upcoming_stops {
        assert_eq!(stop.source, EtaSource::FallbackEstimate);
        let expected = fallback_estimate(vanaz(), stop.station.location, Profile::Walking);
        assert_eq!(stop.eta_seconds, expected.duration_seconds);
        assert_eq!(stop.distance_meters, expected.distance_meters);
    }
}

#[tokio::test]
async fn misaligned_table_keeps_every_stop() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::short_rows();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, Some(3), now())
        .await
        .unwrap();

    assert_eq!(
        ids(&eta.upcoming_stops),
        ["campus", "bavdhan-guard-post", "vanaz-station"]
    );
    assert!(eta
        .upcoming_stops
        .iter()
        .all(|s| s.source == EtaSource::FallbackEstimate));
    assert_eq!(backend.table_calls(), 1);
}

#[tokio::test]
async fn last_stop_uses_a_single_route_call() {
    let fleet = MockFleet::at(fc_road());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, Some(5), now())
        .await
        .unwrap();

    assert_eq!(ids(&eta.upcoming_stops), ["fc-road"]);
    assert_eq!(eta.upcoming_stops[0].status, StopStatus::Arriving);
    assert_eq!(backend.route_calls(), 1);
    assert_eq!(backend.table_calls(), 0);
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let fleet = MockFleet::at(bavdhan());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let first = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();
    let second = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert_eq!(backend.table_calls(), 1);
    assert_eq!(first.upcoming_stops, second.upcoming_stops);
    assert_eq!(fleet.position_calls(), 2);
}

#[tokio::test]
async fn arriving_only_for_the_nearest_stop() {
    let fleet = MockFleet::at(bavdhan());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, Some(3), now())
        .await
        .unwrap();

    let statuses: Vec<_> = eta.upcoming_stops.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        [
            StopStatus::Arriving,
            StopStatus::Upcoming,
            StopStatus::Upcoming
        ]
    );
    assert!(!eta.off_route);
}

#[tokio::test]
async fn staleness_boundary() {
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();
    let backend = CountingBackend::ok();
    let routing = routing(&backend);

    for (age, expected) in [(0, false), (60, false), (61, true), (3600, true)] {
        let fleet = MockFleet::at(bavdhan()).captured(now() - Duration::seconds(age));
        let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
        let eta = engine
            .upcoming_at(SHUTTLE, Profile::Driving, None, now())
            .await
            .unwrap();
        assert_eq!(eta.stale, expected, "age {age}s");
        // Stale data is still answered.
        assert!(!eta.upcoming_stops.is_empty());
    }
}

#[tokio::test]
async fn unknown_route_gives_empty_stops() {
    let fleet = MockFleet::at(bavdhan()).with_schedule("Campus", "Airport");
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert!(eta.route_id.is_none());
    assert!(eta.direction.is_none());
    assert!(eta.current_segment.is_none());
    assert!(eta.upcoming_stops.is_empty());
    // Off-route is still judged against every station.
    assert!(!eta.off_route);
    assert_eq!(backend.table_calls() + backend.route_calls(), 0);
}

#[tokio::test]
async fn schedule_labels_are_normalised() {
    let fleet = MockFleet::at(fc_road()).with_schedule("  fc   ROAD ", "campus");
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert_eq!(eta.route_id.as_deref(), Some("fcroad-campus"));
    assert_eq!(ids(&eta.upcoming_stops), ["fc-road", "vanaz-station"]);
}

#[tokio::test]
async fn unavailable_vehicles_look_the_same() {
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let unknown = MockFleet {
        vehicle: None,
        ..MockFleet::at(bavdhan())
    };
    let mut inactive = MockFleet::at(bavdhan());
    if let Some(v) = &mut inactive.vehicle {
        v.active = false;
    }
    let unscheduled = MockFleet {
        schedule: None,
        ..MockFleet::at(bavdhan())
    };

    for fleet in [&unknown, &inactive, &unscheduled] {
        let engine = EtaEngine::new(fleet, &routing, &registry, &config);
        let err = engine
            .upcoming_at(SHUTTLE, Profile::Driving, None, now())
            .await
            .unwrap_err();
        assert_eq!(err, EtaError::NotAvailable);
        assert_eq!(fleet.position_calls(), 0);
    }
}

#[tokio::test]
async fn position_failure_is_propagated() {
    let fleet = MockFleet {
        position: Err(FleetError::UpstreamUnavailable {
            vehicle: SHUTTLE,
            message: "device offline".to_string(),
        }),
        ..MockFleet::at(bavdhan())
    };
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let err = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap_err();

    assert_eq!(err, EtaError::UpstreamUnavailable("device offline".into()));
    assert_eq!(backend.table_calls() + backend.route_calls(), 0);
}

#[tokio::test]
async fn segment_progress_between_stops() {
    // Nine tenths of the way from Campus to Bavdhan.
    let here = coord(18.519199, 73.762531);
    let fleet = MockFleet::at(here);
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert!(!eta.off_route);
    let segment = eta.current_segment.unwrap();
    assert_eq!(segment.from_stop.id, "campus");
    assert_eq!(segment.to_stop.id, "bavdhan-guard-post");
    assert_eq!(segment.total_distance_meters, geo::distance(campus(), bavdhan()));
    assert_eq!(segment.remaining_distance_meters, geo::distance(here, bavdhan()));
    assert!(
        (0.85..0.95).contains(&segment.progress_ratio),
        "{}",
        segment.progress_ratio
    );
}

#[tokio::test]
async fn no_segment_at_first_stop() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let eta = engine
        .upcoming_at(SHUTTLE, Profile::Driving, None, now())
        .await
        .unwrap();

    assert!(eta.current_segment.is_none());
    assert_eq!(eta.upcoming_stops[0].station.id, "campus");
}

#[test]
fn segment_ratio_is_clamped() {
    let registry = campus_routes().unwrap();
    let route = registry.get("campus-fcroad").unwrap();

    // Farther from Bavdhan than Campus is: ratio would be negative.
    let behind = coord(18.530, 73.700);
    let segment = segment_progress(behind, route, 1).unwrap();
    assert_eq!(segment.progress_ratio, 0.0);

    let at_stop = segment_progress(bavdhan(), route, 1).unwrap();
    assert_eq!(at_stop.progress_ratio, 1.0);

    assert!(segment_progress(campus(), route, 0).is_none());
    assert!(segment_progress(campus(), route, 4).is_none());
}

#[test]
fn arriving_boundary() {
    assert_eq!(classify_stop(0.0, 100.0), StopStatus::Arriving);
    assert_eq!(classify_stop(99.999, 100.0), StopStatus::Arriving);
    assert_eq!(classify_stop(100.0, 100.0), StopStatus::Upcoming);
    assert_eq!(classify_stop(100.001, 100.0), StopStatus::Upcoming);
}

#[test]
fn off_route_boundary() {
    let registry = campus_routes().unwrap();
    let stations = registry.all_stations();
    let here = coord(18.5230, 73.7600);
    let nearest = geo::distance(here, bavdhan());

    assert!(!is_off_route(here, stations, nearest));
    assert!(is_off_route(here, stations, nearest - 1e-6));
    assert!(!is_off_route(bavdhan(), stations, 500.0));
    assert!(!is_off_route(here, &[], 500.0));
}

#[test]
fn selection_truncates_at_route_end() {
    let registry = campus_routes().unwrap();
    let route = registry.get("campus-fcroad").unwrap();

    let selection = select_upcoming(vanaz(), &route.stops, 2).unwrap();
    assert_eq!(selection.nearest, 2);
    assert_eq!(selection.distance, 0.0);
    assert_eq!(selection.stops.len(), 2);

    let selection = select_upcoming(vanaz(), &route.stops, 10).unwrap();
    assert_eq!(selection.stops.len(), 2);

    assert!(select_upcoming(vanaz(), &[], 2).is_none());
}

#[tokio::test]
async fn by_coordinates_preserves_target_order() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let targets = vec![
        Target {
            id: "fc".into(),
            location: fc_road(),
        },
        Target {
            id: "bavdhan".into(),
            location: bavdhan(),
        },
        Target {
            id: "vanaz".into(),
            location: vanaz(),
        },
    ];

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let result = engine
        .by_coordinates(campus(), targets, Profile::Walking)
        .await
        .unwrap();

    let ids: Vec<_> = result.targets.iter().map(|t| t.target.id.as_str()).collect();
    assert_eq!(ids, ["fc", "bavdhan", "vanaz"]);
    assert_eq!(result.mode, Profile::Walking);
    assert_eq!(result.origin, campus());
    assert_eq!(
        result.targets[1].distance_meters,
        road_leg(campus(), bavdhan()).distance
    );
    assert_eq!(backend.table_calls(), 1);
    assert_eq!(backend.route_calls(), 0);
    // No vehicle involved.
    assert_eq!(fleet.position_calls(), 0);
}

#[tokio::test]
async fn by_coordinates_single_target_uses_route() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();

    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);
    let result = engine
        .by_coordinates(
            campus(),
            vec![Target {
                id: "fc".into(),
                location: fc_road(),
            }],
            Profile::Driving,
        )
        .await
        .unwrap();

    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].source, EtaSource::RoutingEngine);
    assert_eq!(backend.route_calls(), 1);
    assert_eq!(backend.table_calls(), 0);
}

#[tokio::test]
async fn by_coordinates_target_count_limits() {
    let fleet = MockFleet::at(campus());
    let backend = CountingBackend::ok();
    let routing = routing(&backend);
    let registry = campus_routes().unwrap();
    let config = EtaConfig::default();
    let engine = EtaEngine::new(&fleet, &routing, &registry, &config);

    let err = engine
        .by_coordinates(campus(), Vec::new(), Profile::Driving)
        .await
        .unwrap_err();
    assert!(matches!(err, EtaError::InvalidRequest(_)));

    let many: Vec<Target> = (0..11u32)
        .map(|i| Target {
            id: format!("t{i}"),
            location: coord(18.5 + f64::from(i) * 0.001, 73.8),
        })
        .collect();
    let err = engine
        .by_coordinates(campus(), many, Profile::Driving)
        .await
        .unwrap_err();
    assert!(matches!(err, EtaError::InvalidRequest(_)));

    assert_eq!(backend.table_calls() + backend.route_calls(), 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearest_stop_is_selected_at_each_stop(
            route_idx in 0usize..4,
            stop_seed in 0usize..4,
            dlat in -1e-4f64..1e-4,
            dlon in -1e-4f64..1e-4,
        ) {
            let registry = campus_routes().unwrap();
            let route = &registry.routes()[route_idx];
            let stop_idx = stop_seed % route.stops.len();
            let stop = route.stops[stop_idx].location;
            let here = coord(stop.lat() + dlat, stop.lon() + dlon);

            let selection = select_upcoming(here, &route.stops, 10).unwrap();
            prop_assert_eq!(selection.nearest, stop_idx);
            prop_assert_eq!(&selection.stops[0].id, &route.stops[stop_idx].id);
            prop_assert_eq!(selection.stops.len(), route.stops.len() - stop_idx);
        }

        #[test]
        fn selection_is_argmin(
            lat in 18.45f64..18.60,
            lon in 73.68f64..73.90,
            max_stops in 1usize..=10,
        ) {
            let registry = campus_routes().unwrap();
            let here = coord(lat, lon);

            for route in registry.routes() {
                let selection = select_upcoming(here, &route.stops, max_stops).unwrap();
                for stop in route.stops.iter() {
                    prop_assert!(selection.distance <= geo::distance(here, stop.location));
                }
                prop_assert!(selection.stops.len() <= max_stops);
                prop_assert!(!selection.stops.is_empty());
            }
        }

        #[test]
        fn classification_matches_threshold(distance in 0.0f64..1000.0) {
            let status = classify_stop(distance, 100.0);
            prop_assert_eq!(status == StopStatus::Arriving, distance < 100.0);
        }
    }
}
