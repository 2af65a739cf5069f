//! Fleet lookup error types.

use crate::domain::VehicleId;

/// Errors from the fleet collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FleetError {
    /// No vehicle with this id
    #[error("vehicle {0} not found")]
    NotFound(VehicleId),

    /// Live position could not be fetched
    #[error("position unavailable for vehicle {vehicle}: {message}")]
    UpstreamUnavailable { vehicle: VehicleId, message: String },

    /// Fleet file could not be read or parsed
    #[error("failed to load fleet file {path}: {message}")]
    Load { path: String, message: String },
}
