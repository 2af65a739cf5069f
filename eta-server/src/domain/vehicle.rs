//! Vehicle and schedule records supplied by the fleet collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric vehicle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,

    /// Display label, e.g. "Shuttle 1".
    #[serde(default)]
    pub label: String,

    /// Whether the vehicle is publicly visible.
    #[serde(default)]
    pub active: bool,
}

/// A scheduled trip for a vehicle, as free-text endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub vehicle_id: VehicleId,
    pub from_location: String,
    pub to_location: String,
    #[serde(default)]
    pub active: bool,
}
