//! OSRM (Open Source Routing Machine) HTTP client.
//!
//! Two services are used:
//! - `route` for a single origin/destination pair
//! - `table` for one origin to many destinations in a single request
//!
//! OSRM takes coordinates as `lon,lat` pairs joined with `;`.

mod client;
mod error;
mod types;

pub use client::{OsrmClient, OsrmConfig};
pub use error::OsrmError;
pub use types::{Leg, RouteResponse, TableResponse};
