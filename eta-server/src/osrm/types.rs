//! OSRM response payloads.

use serde::Deserialize;

use super::error::OsrmError;

/// Travel time and road distance for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Seconds.
    pub duration: f64,
    /// Metres.
    pub distance: f64,
}

/// Response of `/route/v1/{profile}/{coords}`.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteItem>,
}

#[derive(Debug, Deserialize)]
pub struct RouteItem {
    pub duration: f64,
    pub distance: f64,
}

/// Response of `/table/v1/{profile}/{coords}` with a single source.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    /// One row per source; cells are `null` when no route exists.
    #[serde(default)]
    pub durations: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
}

fn check_code(code: &str, message: Option<&str>) -> Result<(), OsrmError> {
    if code == "Ok" {
        return Ok(());
    }
    Err(OsrmError::NoRoute {
        code: code.to_string(),
        message: message.unwrap_or("no route found").to_string(),
    })
}

impl RouteResponse {
    /// The first (best) route.
    pub fn into_leg(self) -> Result<Leg, OsrmError> {
        check_code(&self.code, self.message.as_deref())?;

        let route = self.routes.first().ok_or_else(|| OsrmError::Malformed {
            message: "no routes returned".to_string(),
            body: None,
        })?;

        Ok(Leg {
            duration: route.duration,
            distance: route.distance,
        })
    }
}

impl TableResponse {
    /// The first row, one cell per destination, in destination order.
    ///
    /// A `None` cell means OSRM found no route to that destination.
    pub fn into_legs(self, expected: usize) -> Result<Vec<Option<Leg>>, OsrmError> {
        check_code(&self.code, self.message.as_deref())?;

        let durations = self.durations.into_iter().next().unwrap_or_default();
        let distances = self.distances.into_iter().next().unwrap_or_default();

        if durations.len() != expected || distances.len() != expected {
            return Err(OsrmError::Malformed {
                message: format!(
                    "incomplete matrix: expected {expected} cells, got {} durations and {} distances",
                    durations.len(),
                    distances.len()
                ),
                body: None,
            });
        }

        Ok(durations
            .into_iter()
            .zip(distances)
            .map(|cell| match cell {
                (Some(duration), Some(distance)) => Some(Leg { duration, distance }),
                _ => None,
            })
            .collect())
    }
}
