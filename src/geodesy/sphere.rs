//! Great-circle distance, bearing, and area on a fixed-radius sphere.

use bevy::math::DVec2;

use crate::constants::{COORD_EPSILON, EARTH_RADIUS_M};

/// Geodesic distance in meters between two lon/lat degree coordinates,
/// using the haversine formula.
///
/// Returns 0 for coincident points.
pub fn segment_length(a: DVec2, b: DVec2) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    // Clamp guards against rounding pushing sqrt's argument past 1 for
    // antipodal points.
    2.0 * EARTH_RADIUS_M * h.sqrt().clamp(0.0, 1.0).asin()
}

/// Initial great-circle bearing from `a` to `b` in degrees clockwise from
/// true north, normalized to `[0, 360)`.
///
/// Coincident points yield 0 (atan2(0, 0) is 0 in IEEE arithmetic).
pub fn bearing(a: DVec2, b: DVec2) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Geodesic area in square meters of a closed lon/lat ring, using the
/// spherical-excess approximation of Chamberlain & Duquette.
///
/// The ring is expected closed (last coordinate equal to the first). Rings
/// with fewer than 4 coordinates (3 unique vertices + closing duplicate)
/// cannot enclose area and yield 0.
pub fn ring_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 4 {
        return 0.0;
    }

    let mut sum = 0.0;
    for pair in ring.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        sum += (p2.x - p1.x).to_radians() * (2.0 + p1.y.to_radians().sin() + p2.y.to_radians().sin());
    }

    (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Tolerance-based coordinate equality in degrees.
///
/// Used to detect ring closure and to suppress the synthetic closing
/// segment in measurement output.
pub fn coords_equal(a: DVec2, b: DVec2, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// [`coords_equal`] with the default [`COORD_EPSILON`] tolerance.
pub fn coords_equal_default(a: DVec2, b: DVec2) -> bool {
    coords_equal(a, b, COORD_EPSILON)
}
