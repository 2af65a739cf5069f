//! Routing-engine client with caching and a deterministic fallback.
//!
//! Callers of [`RoutingClient::route`] and [`RoutingClient::table`] always
//! receive an answer: a cached or live routing-engine result, or a
//! straight-line estimate when the engine is unreachable, slow, returns an
//! error, or is not configured at all. Engine failures are logged and
//! absorbed here; they never reach the caller.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, QueryKey, RouteCache};
use crate::domain::{Coordinate, Profile};
use crate::geo;
use crate::osrm::{Leg, OsrmClient, OsrmError};

/// Where an ETA figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EtaSource {
    /// Live or cached answer from the routing engine.
    RoutingEngine,
    /// Great-circle distance at the profile's average speed.
    FallbackEstimate,
}

impl EtaSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtaSource::RoutingEngine => "routing-engine",
            EtaSource::FallbackEstimate => "fallback-estimate",
        }
    }
}

/// Travel time and distance to one destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEstimate {
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub source: EtaSource,
}

impl RouteEstimate {
    fn live(leg: Leg) -> Self {
        Self {
            duration_seconds: leg.duration,
            distance_meters: leg.distance,
            source: EtaSource::RoutingEngine,
        }
    }
}

/// Straight-line estimate: haversine distance at the profile's average speed.
pub fn fallback_estimate(
    origin: Coordinate,
    destination: Coordinate,
    profile: Profile,
) -> RouteEstimate {
    let distance = geo::distance(origin, destination);
    RouteEstimate {
        duration_seconds: distance / profile.average_speed(),
        distance_meters: distance,
        source: EtaSource::FallbackEstimate,
    }
}

/// Invalid input to the routing client.
///
/// Coordinates are validated when constructed, so the only remaining
/// failure is an empty destination list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("at least one destination is required")]
    NoDestinations,
}

/// An external routing engine.
///
/// Abstracted so the client can be exercised without network access.
pub trait RoutingBackend: Send + Sync {
    /// Best route between two points.
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: Profile,
    ) -> impl Future<Output = Result<Leg, OsrmError>> + Send;

    /// One-to-many matrix in a single request, aligned with `destinations`.
    fn fetch_table(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> impl Future<Output = Result<Vec<Option<Leg>>, OsrmError>> + Send;
}

impl RoutingBackend for OsrmClient {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: Profile,
    ) -> Result<Leg, OsrmError> {
        self.route(origin, destination, profile).await
    }

    async fn fetch_table(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> Result<Vec<Option<Leg>>, OsrmError> {
        self.table(origin, destinations, profile).await
    }
}

/// Routing client: cache in front of a backend, fallback behind it.
///
/// Owns its cache exclusively. No lock is held while a backend request is
/// in flight; two concurrent misses on one key may both hit the backend.
pub struct RoutingClient<B = OsrmClient> {
    backend: Option<B>,
    cache: RouteCache,
}

impl<B: RoutingBackend> RoutingClient<B> {
    /// Create a client backed by a routing engine.
    pub fn new(backend: B, cache_config: &CacheConfig) -> Self {
        Self {
            backend: Some(backend),
            cache: RouteCache::new(cache_config),
        }
    }

    /// Create a client with no routing engine; every answer is a fallback.
    pub fn offline(cache_config: &CacheConfig) -> Self {
        Self {
            backend: None,
            cache: RouteCache::new(cache_config),
        }
    }

    /// Whether a routing engine is configured.
    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// Travel time and distance for a single origin/destination pair.
    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: Profile,
    ) -> RouteEstimate {
        let key = QueryKey::route(origin, destination, profile);

        if let Some(hit) = self.cache.get(&key).await
            && let Some(leg) = hit.first()
        {
            debug!(%origin, %destination, %profile, "route cache hit");
            return RouteEstimate::live(*leg);
        }

        let Some(backend) = &self.backend else {
            return fallback_estimate(origin, destination, profile);
        };

        match backend.fetch_route(origin, destination, profile).await {
            Ok(leg) => {
                self.cache.insert(key, Arc::new(vec![leg])).await;
                RouteEstimate::live(leg)
            }
            Err(e) => {
                warn!(%origin, %destination, %profile, error = %e, "routing engine failed, using fallback estimate");
                fallback_estimate(origin, destination, profile)
            }
        }
    }

    /// Travel time and distance from `origin` to each destination.
    ///
    /// Makes at most one backend request regardless of how many destinations
    /// are given. The result is positionally aligned with `destinations`.
    /// A destination the engine cannot route to gets a fallback estimate, and
    /// a result containing any fallback is not cached.
    pub async fn table(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> Result<Vec<RouteEstimate>, RoutingError> {
        if destinations.is_empty() {
            return Err(RoutingError::NoDestinations);
        }

        let key = QueryKey::table(origin, destinations, profile);

        if let Some(hit) = self.cache.get(&key).await
            && hit.len() == destinations.len()
        {
            debug!(%origin, count = destinations.len(), %profile, "table cache hit");
            return Ok(hit.iter().copied().map(RouteEstimate::live).collect());
        }

        let fallback_all = || -> Vec<RouteEstimate> {
            destinations
                .iter()
                .map(|&d| fallback_estimate(origin, d, profile))
                .collect()
        };

        let Some(backend) = &self.backend else {
            return Ok(fallback_all());
        };

        match backend.fetch_table(origin, destinations, profile).await {
            Ok(cells) if cells.len() != destinations.len() => {
                warn!(
                    %origin,
                    expected = destinations.len(),
                    got = cells.len(),
                    "routing engine table misaligned, using fallback estimates"
                );
                Ok(fallback_all())
            }
            Ok(cells) => {
                let estimates: Vec<RouteEstimate> = cells
                    .iter()
                    .zip(destinations)
                    .map(|(cell, &dest)| match cell {
                        Some(leg) => RouteEstimate::live(*leg),
                        None => fallback_estimate(origin, dest, profile),
                    })
                    .collect();

                let legs: Vec<Leg> = cells.into_iter().flatten().collect();
                if legs.len() == destinations.len() {
                    self.cache.insert(key, Arc::new(legs)).await;
                } else {
                    debug!(
                        unroutable = destinations.len() - legs.len(),
                        "table has unroutable cells, not caching"
                    );
                }

                Ok(estimates)
            }
            Err(e) => {
                warn!(%origin, count = destinations.len(), %profile, error = %e, "routing engine table failed, using fallback estimates");
                Ok(fallback_all())
            }
        }
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
