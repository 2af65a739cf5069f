//! Domain types for the shuttle ETA service.
//!
//! Like the rest of the crate, these types validate on construction:
//! a `Coordinate` is always finite and in range, a `Profile` is always one
//! of the supported travel modes.

mod coordinate;
mod position;
mod profile;
mod vehicle;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use position::Position;
pub use profile::{InvalidProfile, Profile};
pub use vehicle::{Schedule, Vehicle, VehicleId};
