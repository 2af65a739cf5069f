//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::eta::EtaConfig;
use crate::fleet::GpsConfig;
use crate::osrm::OsrmConfig;

const DEFAULT_FLEET_FILE: &str = "fleet.json";

/// An environment variable that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {key}={value:?}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub message: String,
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// `None` runs without a routing engine; every ETA is a fallback.
    pub osrm: Option<OsrmConfig>,

    pub cache: CacheConfig,

    /// `None` disables live positions.
    pub gps: Option<GpsConfig>,

    pub fleet_file: PathBuf,

    pub eta: EtaConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let bind_addr = parse_or(&var, "ETA_BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8000)))?;

        let osrm_timeout = parse_or(&var, "OSRM_TIMEOUT_SECS", 10)?;
        let osrm = match var("OSRM_BASE_URL").as_deref() {
            None => Some(OsrmConfig::default().with_timeout(osrm_timeout)),
            Some("") | Some("off") => None,
            Some(url) => Some(OsrmConfig::new(url).with_timeout(osrm_timeout)),
        };

        let cache = CacheConfig {
            ttl: Duration::from_secs(parse_or(&var, "ROUTE_CACHE_TTL_SECS", 60)?),
            max_capacity: parse_or(&var, "ROUTE_CACHE_CAPACITY", 10_000)?,
        };

        let gps_timeout = parse_or(&var, "GPS_TIMEOUT_SECS", 10)?;
        let gps = match (var("GPS_BASE_URL"), var("GPS_ENDPOINT")) {
            (Some(base), Some(endpoint)) if !base.is_empty() => {
                Some(GpsConfig::new(base, endpoint).with_timeout(gps_timeout))
            }
            _ => None,
        };

        let fleet_file = var("FLEET_FILE")
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FLEET_FILE.to_string())
            .into();

        Ok(Self {
            bind_addr,
            osrm,
            cache,
            gps,
            fleet_file,
            eta: EtaConfig::default(),
        })
    }
}

/// Parse `key` if set and non-empty, otherwise use `default`.
fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key).filter(|v| !v.is_empty()) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError {
            key,
            message: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
