//! Great-circle geometry on a spherical Earth.

use crate::domain::Coordinate;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in metres (haversine).
///
/// Symmetric, and zero for coincident points.
///
/// ```
/// use eta_server::domain::Coordinate;
/// use eta_server::geo::distance;
///
/// let a = Coordinate::new(18.525778, 73.733243).unwrap();
/// let b = Coordinate::new(18.518468, 73.765785).unwrap();
/// assert_eq!(distance(a, a), 0.0);
/// assert_eq!(distance(a, b), distance(b, a));
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Find the candidate closest to `point`.
///
/// Returns the index into `candidates` and the distance in metres. Ties go to
/// the earliest candidate. Returns `None` for an empty slice.
pub fn nearest<T>(
    point: Coordinate,
    candidates: &[T],
    location: impl Fn(&T) -> Coordinate,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, candidate) in candidates.iter().enumerate() {
        let d = distance(point, location(candidate));
        // Strict `<` keeps the first of equal candidates.
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((idx, d));
        }
    }

    best
}
