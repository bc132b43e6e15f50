//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Mean earth radius in meters (IUGG mean radius R1).
///
/// All geodesic lengths and areas assume a fixed-radius sphere with this
/// radius. Measurements are live drawing guidance, not cadastral output,
/// so a spherical model is sufficient as long as it is applied consistently.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Tolerance in degrees for treating two lon/lat coordinates as equal.
/// Roughly one millimeter at the equator.
pub const COORD_EPSILON: f64 = 1e-8;

/// Screen-space radius in pixels within which a snap candidate is accepted.
pub const SNAP_TOLERANCE_PX: f64 = 12.0;

/// Screen-space radius in pixels within which a vertex can be grabbed for
/// dragging once a sketch is finished.
pub const VERTEX_GRAB_TOLERANCE_PX: f64 = 10.0;

/// Maximum delay in seconds between two clicks of a double-click finish.
pub const DOUBLE_CLICK_SECS: f64 = 0.3;

/// Maximum cursor travel in pixels between the two clicks of a
/// double-click finish.
pub const DOUBLE_CLICK_TOLERANCE_PX: f64 = 6.0;

/// Maximum number of ring snapshots to keep in undo history
pub const MAX_HISTORY_SIZE: usize = 100;
