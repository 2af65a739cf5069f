//! OSRM HTTP client.
//!
//! Provides async methods for the `route` and `table` services. Every
//! request carries a bounded timeout; a semaphore caps concurrent requests
//! against the shared routing server.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, Profile};

use super::error::OsrmError;
use super::types::{Leg, RouteResponse, TableResponse};

/// Public OSRM demo server.
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the routing server
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config pointing at the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// OSRM API client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    /// Create a new OSRM client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, OsrmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Shortest route between two points.
    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: Profile,
    ) -> Result<Leg, OsrmError> {
        let url = format!(
            "{}/route/v1/{}/{}",
            self.base_url,
            profile.as_str(),
            coords_path(&[origin, destination])
        );

        let response: RouteResponse = self
            .get_json(&url, &[("overview", "false".to_string())])
            .await?;

        response.into_leg()
    }

    /// Durations and distances from one origin to each destination.
    ///
    /// Issues a single request regardless of the number of destinations.
    /// The result is positionally aligned with `destinations`; a `None`
    /// cell means OSRM found no route to that destination.
    pub async fn table(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: Profile,
    ) -> Result<Vec<Option<Leg>>, OsrmError> {
        let mut coords = Vec::with_capacity(destinations.len() + 1);
        coords.push(origin);
        coords.extend_from_slice(destinations);

        let url = format!(
            "{}/table/v1/{}/{}",
            self.base_url,
            profile.as_str(),
            coords_path(&coords)
        );

        let destination_indices = (1..=destinations.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(";");

        let response: TableResponse = self
            .get_json(
                &url,
                &[
                    ("sources", "0".to_string()),
                    ("destinations", destination_indices),
                    ("annotations", "duration,distance".to_string()),
                ],
            )
            .await?;

        response.into_legs(destinations.len())
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, OsrmError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OsrmError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(url, "OSRM request");

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        // OSRM reports NoRoute and friends as 400 with a JSON body; let those
        // through so the `code` field is surfaced.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(OsrmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OsrmError::Malformed {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

/// Format coordinates as OSRM expects: `lon,lat;lon,lat;...`.
fn coords_path(coords: &[Coordinate]) -> String {
    coords
        .iter()
        .map(|c| format!("{},{}", c.lon(), c.lat()))
        .collect::<Vec<_>>()
        .join(";")
}
