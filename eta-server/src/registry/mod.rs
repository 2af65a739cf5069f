//! Static directed route definitions.
//!
//! A schedule names its trip by free-text endpoints ("Campus" → "FC Road").
//! The registry maps each normalised `(from, to)` pair to an ordered list of
//! stations. A route and its reverse are registered separately; lookups never
//! reverse a route implicitly.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Coordinate, InvalidCoordinate};

/// A fixed stop on one or more routes. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinate,
}

/// A directed, ordered sequence of stations.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub route_id: String,

    /// Human-readable direction, e.g. "Campus → FC Road".
    pub direction: String,

    pub from_location: String,
    pub to_location: String,

    /// At least two stations, none repeated.
    pub stops: Vec<Arc<Station>>,
}

/// Errors building a route registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("station {station}: {source}")]
    InvalidCoordinate {
        station: String,
        source: InvalidCoordinate,
    },

    #[error("route {0} has fewer than two stops")]
    TooFewStops(String),

    #[error("route {route} visits station {station} more than once")]
    RepeatedStation { route: String, station: String },

    #[error("route {route} references unknown station {station}")]
    UnknownStation { route: String, station: String },

    #[error("duplicate station id {0}")]
    DuplicateStation(String),

    #[error("duplicate route id {0}")]
    DuplicateRoute(String),

    #[error("locations {from:?} → {to:?} are already served by route {existing}")]
    DuplicateLocations {
        from: String,
        to: String,
        existing: String,
    },
}

/// Normalise a free-text location label for lookup.
///
/// Trims, lower-cases and collapses runs of whitespace, so
/// `"  FC   road "` and `"FC Road"` compare equal.
pub fn normalize_location(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read-only lookup of routes by schedule endpoints.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    /// Stations in registration order.
    stations: Vec<Arc<Station>>,

    /// Routes in registration order.
    routes: Vec<Route>,

    /// Normalised (from, to) → index into `routes`.
    by_locations: HashMap<(String, String), usize>,
}

impl RouteRegistry {
    /// Resolve a schedule's endpoints to a route.
    pub fn resolve(&self, from_location: &str, to_location: &str) -> Option<&Route> {
        let key = (
            normalize_location(from_location),
            normalize_location(to_location),
        );
        self.by_locations.get(&key).map(|&idx| &self.routes[idx])
    }

    /// Look up a route by its identifier.
    pub fn get(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.route_id == route_id)
    }

    /// Every known station, across all routes, in registration order.
    pub fn all_stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builder for a validated [`RouteRegistry`].
#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
    stations: Vec<(String, String, f64, f64)>,
    routes: Vec<(String, String, String, String, Vec<String>)>,
}

impl RouteRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station.
    pub fn station(mut self, id: &str, name: &str, lat: f64, lon: f64) -> Self {
        self.stations
            .push((id.to_string(), name.to_string(), lat, lon));
        self
    }

    /// Register a directed route through the given station ids, in order.
    pub fn route(
        mut self,
        route_id: &str,
        direction: &str,
        from_location: &str,
        to_location: &str,
        stops: &[&str],
    ) -> Self {
        self.routes.push((
            route_id.to_string(),
            direction.to_string(),
            from_location.to_string(),
            to_location.to_string(),
            stops.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Validate and build the registry.
    pub fn build(self) -> Result<RouteRegistry, RegistryError> {
        let mut stations = Vec::with_capacity(self.stations.len());
        for (id, name, lat, lon) in self.stations {
            let location = Coordinate::new(lat, lon).map_err(|source| {
                RegistryError::InvalidCoordinate {
                    station: id.clone(),
                    source,
                }
            })?;
            if stations.iter().any(|s: &Arc<Station>| s.id == id) {
                return Err(RegistryError::DuplicateStation(id));
            }
            stations.push(Arc::new(Station { id, name, location }));
        }

        let by_id: HashMap<&str, &Arc<Station>> =
            stations.iter().map(|s| (s.id.as_str(), s)).collect();

        let mut routes = Vec::with_capacity(self.routes.len());
        let mut by_locations = HashMap::new();

        for (route_id, direction, from_location, to_location, stop_ids) in self.routes {
            if stop_ids.len() < 2 {
                return Err(RegistryError::TooFewStops(route_id));
            }
            if routes.iter().any(|r: &Route| r.route_id == route_id) {
                return Err(RegistryError::DuplicateRoute(route_id));
            }

            let mut seen = HashSet::new();
            let mut stops = Vec::with_capacity(stop_ids.len());
            for stop_id in &stop_ids {
                if !seen.insert(stop_id.as_str()) {
                    return Err(RegistryError::RepeatedStation {
                        route: route_id,
                        station: stop_id.clone(),
                    });
                }
                let station = by_id.get(stop_id.as_str()).ok_or_else(|| {
                    RegistryError::UnknownStation {
                        route: route_id.clone(),
                        station: stop_id.clone(),
                    }
                })?;
                stops.push(Arc::clone(*station));
            }

            let key = (
                normalize_location(&from_location),
                normalize_location(&to_location),
            );
            if let Some(&existing) = by_locations.get(&key) {
                let existing: &Route = &routes[existing];
                return Err(RegistryError::DuplicateLocations {
                    from: from_location,
                    to: to_location,
                    existing: existing.route_id.clone(),
                });
            }
            by_locations.insert(key, routes.len());

            routes.push(Route {
                route_id,
                direction,
                from_location,
                to_location,
                stops,
            });
        }

        Ok(RouteRegistry {
            stations,
            routes,
            by_locations,
        })
    }
}

/// The campus shuttle network.
///
/// Each direction is its own route.
pub fn campus_routes() -> Result<RouteRegistry, RegistryError> {
    RouteRegistryBuilder::new()
        .station("campus", "FLAME Campus", 18.525778, 73.733243)
        .station("bavdhan-guard-post", "Bavdhan Check Post", 18.518468, 73.765785)
        .station("vanaz-station", "Vanaz Metro Station", 18.507034, 73.805283)
        .station("fc-road", "FC Road", 18.522335, 73.843739)
        .route(
            "campus-fcroad",
            "Campus → FC Road",
            "Campus",
            "FC Road",
            &["campus", "bavdhan-guard-post", "vanaz-station", "fc-road"],
        )
        .route(
            "fcroad-campus",
            "FC Road → Campus",
            "FC Road",
            "Campus",
            &["fc-road", "vanaz-station", "bavdhan-guard-post", "campus"],
        )
        .route(
            "campus-bavdhan",
            "Campus → Bavdhan Guard Post",
            "Campus",
            "Bavdhan Guard post",
            &["campus", "bavdhan-guard-post"],
        )
        .route(
            "bavdhan-campus",
            "Bavdhan Guard Post → Campus",
            "Bavdhan Guard post",
            "Campus",
            &["bavdhan-guard-post", "campus"],
        )
        .build()
}
