//! Caching layer for routing-engine answers.
//!
//! Keys are built from coordinates rounded to a fixed grid, so two requests
//! from a vehicle that has moved less than about a metre share an entry.
//! Entries live for a fixed TTL from insertion and are dropped lazily when a
//! lookup finds them expired. Only live routing-engine answers are stored;
//! fallback estimates never are.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Profile};
use crate::osrm::Leg;

/// Decimal places kept when rounding coordinates for cache keys.
/// Five places is roughly 1.1 m of latitude.
pub const KEY_PRECISION: i32 = 5;

/// A coordinate snapped to the cache grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    lat: i64,
    lon: i64,
}

impl GridPoint {
    pub fn snap(c: Coordinate) -> Self {
        let scale = 10f64.powi(KEY_PRECISION);
        Self {
            lat: (c.lat() * scale).round() as i64,
            lon: (c.lon() * scale).round() as i64,
        }
    }
}

/// Which routing-engine service produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Route,
    Table,
}

/// Cache key: (service, rounded origin, rounded destinations, profile).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: QueryKind,
    origin: GridPoint,
    destinations: Vec<GridPoint>,
    profile: Profile,
}

impl QueryKey {
    pub fn route(origin: Coordinate, destination: Coordinate, profile: Profile) -> Self {
        Self {
            kind: QueryKind::Route,
            origin: GridPoint::snap(origin),
            destinations: vec![GridPoint::snap(destination)],
            profile,
        }
    }

    pub fn table(origin: Coordinate, destinations: &[Coordinate], profile: Profile) -> Self {
        Self {
            kind: QueryKind::Table,
            origin: GridPoint::snap(origin),
            destinations: destinations.iter().copied().map(GridPoint::snap).collect(),
            profile,
        }
    }
}

/// Cached routing answer, one leg per destination in query order.
pub type QueryEntry = Arc<Vec<Leg>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 10_000,
        }
    }
}

/// Concurrent TTL cache of routing-engine answers.
///
/// Readers never observe a partially written entry: values are immutable
/// `Arc`s swapped in whole. Concurrent inserts for the same key may race;
/// the last one wins.
#[derive(Clone)]
pub struct RouteCache {
    entries: MokaCache<QueryKey, QueryEntry>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Get a live entry, if present and not expired.
    pub async fn get(&self, key: &QueryKey) -> Option<QueryEntry> {
        self.entries.get(key).await
    }

    /// Insert an entry, replacing any existing one.
    pub async fn insert(&self, key: QueryKey, entry: QueryEntry) {
        self.entries.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}
