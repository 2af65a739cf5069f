//! GPS tracking API client.
//!
//! Each tracking device has its own access token. The API answers
//! `{"successful": bool, "message": .., "object": [device, ..]}` where the
//! first device carries the latest fix.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Coordinate, InvalidCoordinate, Position};

/// Configuration for the GPS client.
#[derive(Debug, Clone)]
pub struct GpsConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Path of the device-info endpoint, appended to `base_url`
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GpsConfig {
    pub fn new(base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            timeout_secs: 10,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Errors from the GPS API.
#[derive(Debug, thiserror::Error)]
pub enum GpsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// API answered but reported failure
    #[error("GPS API request failed: {0}")]
    Rejected(String),

    /// API answered with no device data
    #[error("no device data found")]
    NoDevice,

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Device reported an impossible coordinate
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),
}

#[derive(Debug, Deserialize)]
struct DeviceResponse {
    #[serde(default)]
    successful: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    object: Vec<DeviceInfo>,
}

/// One device entry from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl DeviceInfo {
    /// Convert to a position. An unparseable timestamp is replaced by
    /// `fetched_at`.
    pub fn to_position(&self, fetched_at: DateTime<Utc>) -> Result<Position, InvalidCoordinate> {
        let location = Coordinate::new(self.latitude, self.longitude)?;

        let captured_at = self
            .timestamp
            .as_deref()
            .and_then(parse_device_time)
            .unwrap_or_else(|| {
                debug!(timestamp = ?self.timestamp, "unparseable device timestamp, using fetch time");
                fetched_at
            });

        Ok(Position {
            location,
            captured_at,
            speed: self.speed,
            valid: self.valid,
        })
    }
}

/// Parse an ISO-8601 device timestamp. Naive timestamps are taken as UTC.
fn parse_device_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

/// Client for the GPS tracking API.
#[derive(Debug, Clone)]
pub struct GpsClient {
    http: reqwest::Client,
    url: String,
}

impl GpsClient {
    pub fn new(config: GpsConfig) -> Result<Self, GpsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.endpoint
            ),
        })
    }

    /// Fetch the latest fix for the device identified by `access_token`.
    pub async fn fetch_position(&self, access_token: &str) -> Result<Position, GpsError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("accessToken", access_token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GpsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let fetched_at = Utc::now();

        parse_device_response(&body, fetched_at)
    }
}

/// Decode a device-info response body into a position.
fn parse_device_response(body: &str, fetched_at: DateTime<Utc>) -> Result<Position, GpsError> {
    let response: DeviceResponse = serde_json::from_str(body).map_err(|e| GpsError::Json {
        message: e.to_string(),
    })?;

    if !response.successful {
        return Err(GpsError::Rejected(
            response
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let device = response.object.first().ok_or(GpsError::NoDevice)?;
    Ok(device.to_position(fetched_at)?)
}
