//! File-backed fleet directory.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::domain::{Position, Schedule, Vehicle, VehicleId};

use super::error::FleetError;
use super::gps::GpsClient;
use super::FleetProvider;

/// A vehicle plus the tracking-device token used to locate it.
#[derive(Clone, Deserialize)]
pub struct VehicleRecord {
    #[serde(flatten)]
    pub vehicle: Vehicle,

    #[serde(default)]
    pub access_token: Option<String>,
}

// Tokens grant access to live positions; keep them out of logs.
impl fmt::Debug for VehicleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleRecord")
            .field("vehicle", &self.vehicle)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// On-disk fleet description.
///
/// ```json
/// {
///   "vehicles": [{"id": 1, "label": "Shuttle 1", "active": true, "access_token": "..."}],
///   "schedules": [{"vehicle_id": 1, "from_location": "Campus", "to_location": "FC Road", "active": true}]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FleetFile {
    #[serde(default)]
    pub vehicles: Vec<VehicleRecord>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// Vehicles and schedules held in memory, positions from the GPS API.
#[derive(Debug)]
pub struct FleetDirectory {
    vehicles: HashMap<VehicleId, VehicleRecord>,
    /// In file order; the first active schedule for a vehicle wins.
    schedules: Vec<Schedule>,
    gps: Option<GpsClient>,
}

impl FleetDirectory {
    /// Build a directory from parsed records.
    ///
    /// Without a GPS client, every position lookup fails with
    /// `UpstreamUnavailable`.
    pub fn new(file: FleetFile, gps: Option<GpsClient>) -> Self {
        let mut vehicles = HashMap::with_capacity(file.vehicles.len());
        for record in file.vehicles {
            let id = record.vehicle.id;
            if vehicles.insert(id, record).is_some() {
                warn!(vehicle = %id, "duplicate vehicle id in fleet file, keeping the last entry");
            }
        }

        Self {
            vehicles,
            schedules: file.schedules,
            gps,
        }
    }

    /// Load a directory from a JSON file.
    pub fn load(path: impl AsRef<Path>, gps: Option<GpsClient>) -> Result<Self, FleetError> {
        let path = path.as_ref();
        let load_err = |message: String| FleetError::Load {
            path: path.display().to_string(),
            message,
        };

        let json = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let file: FleetFile = serde_json::from_str(&json).map_err(|e| load_err(e.to_string()))?;

        Ok(Self::new(file, gps))
    }

    /// Number of known vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl FleetProvider for FleetDirectory {
    async fn vehicle(&self, id: VehicleId) -> Result<Vehicle, FleetError> {
        self.vehicles
            .get(&id)
            .map(|r| r.vehicle.clone())
            .ok_or(FleetError::NotFound(id))
    }

    async fn active_schedule(&self, id: VehicleId) -> Result<Option<Schedule>, FleetError> {
        Ok(self
            .schedules
            .iter()
            .find(|s| s.vehicle_id == id && s.active)
            .cloned())
    }

    async fn current_position(&self, id: VehicleId) -> Result<Position, FleetError> {
        let unavailable = |message: String| FleetError::UpstreamUnavailable {
            vehicle: id,
            message,
        };

        let record = self.vehicles.get(&id).ok_or(FleetError::NotFound(id))?;
        let gps = self
            .gps
            .as_ref()
            .ok_or_else(|| unavailable("GPS API not configured".to_string()))?;
        let token = record
            .access_token
            .as_deref()
            .ok_or_else(|| unavailable("vehicle has no tracking device".to_string()))?;

        gps.fetch_position(token).await.map_err(|e| {
            warn!(vehicle = %id, error = %e, "GPS fetch failed");
            unavailable(e.to_string())
        })
    }
}
