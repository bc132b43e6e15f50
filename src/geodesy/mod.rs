//! Geodesic measurement primitives.
//!
//! Pure, stateless functions over `[longitude, latitude]` degree pairs
//! (`DVec2`, x = longitude, y = latitude). All lengths and areas assume a
//! fixed-radius sphere ([`crate::constants::EARTH_RADIUS_M`]); the model is
//! deliberately simple but applied consistently everywhere.
//!
//! ## Module Structure
//!
//! - [`sphere`] - Great-circle distance, bearing, and ring area
//! - [`units`] - Distance/area unit enums and human-readable formatting
//!
//! All functions are total over finite numeric input: degenerate geometry
//! (coincident points, rings too short to enclose area) yields 0, never a
//! panic or NaN.

mod sphere;
mod units;

pub use sphere::{bearing, coords_equal, coords_equal_default, ring_area, segment_length};
pub use units::{
    format_area, format_bearing, format_bearing_compact, format_distance, AreaUnit, DistanceUnit,
};
