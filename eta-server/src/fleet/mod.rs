//! Vehicle, schedule and live-position lookup.
//!
//! The ETA engine depends only on the [`FleetProvider`] trait. The
//! production implementation is [`FleetDirectory`]: vehicles and schedules
//! loaded from a JSON file, positions fetched on demand from the GPS
//! tracking API.

mod directory;
mod error;
mod gps;

use std::future::Future;

pub use directory::{FleetDirectory, FleetFile, VehicleRecord};
pub use error::FleetError;
pub use gps::{DeviceInfo, GpsClient, GpsConfig, GpsError};

use crate::domain::{Position, Schedule, Vehicle, VehicleId};

/// Source of vehicle, schedule and position data.
pub trait FleetProvider: Send + Sync {
    /// Look up a vehicle. Fails with `NotFound` for an unknown id.
    fn vehicle(&self, id: VehicleId) -> impl Future<Output = Result<Vehicle, FleetError>> + Send;

    /// The vehicle's currently active schedule, if any.
    fn active_schedule(
        &self,
        id: VehicleId,
    ) -> impl Future<Output = Result<Option<Schedule>, FleetError>> + Send;

    /// Fetch a fresh position fix. Fails with `UpstreamUnavailable` when the
    /// tracking device or API cannot provide one.
    fn current_position(
        &self,
        id: VehicleId,
    ) -> impl Future<Output = Result<Position, FleetError>> + Send;
}
