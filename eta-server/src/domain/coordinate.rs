//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Latitude is within `[-90, 90]` and longitude within `[-180, 180]`;
/// both are finite. Any `Coordinate` value satisfies this by construction.
///
/// # Examples
///
/// ```
/// use eta_server::domain::Coordinate;
///
/// let campus = Coordinate::new(18.525778, 73.733243).unwrap();
/// assert_eq!(campus.lat(), 18.525778);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        let fail = |reason: &'static str| -> Result<Self, InvalidCoordinate> {
            Err(InvalidCoordinate { lat, lon, reason })
        };

        if !lat.is_finite() || !lon.is_finite() {
            return fail("must be finite");
        }
        if !(-90.0..=90.0).contains(&lat) {
            return fail("latitude must be within [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&lon) {
            return fail("longitude must be within [-180, 180]");
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Unvalidated wire form `{"lat": .., "lon": ..}`.
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            lat: c.lat,
            lon: c.lon,
        }
    }
}
