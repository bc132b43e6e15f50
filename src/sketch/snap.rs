//! Snap-target search over the in-progress sketch and reference geometries.
//!
//! Candidates are compared in screen space: the caller supplies a
//! projection from map coordinates to viewport pixels, so the search works
//! against any camera without this module knowing about one.

use bevy::math::DVec2;
use bevy::prelude::*;

/// Read-only registry of reference geometries the host exposes for
/// snapping, in registration order. The in-progress sketch is not part of
/// this registry; [`find_snap_target`] receives it separately.
#[derive(Resource, Default)]
pub struct SnapSources {
    geometries: Vec<Vec<DVec2>>,
}

impl SnapSources {
    pub fn register(&mut self, coords: Vec<DVec2>) {
        self.geometries.push(coords);
    }

    pub fn geometries(&self) -> &[Vec<DVec2>] {
        &self.geometries
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.geometries.clear();
    }
}

/// The vertex a cursor position snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Map coordinate of the snapped vertex
    pub coord: DVec2,
    /// Index of the owning source in [`SnapSources`]; `None` when the
    /// target is a vertex of the in-progress sketch itself
    pub source_index: Option<usize>,
    /// Screen-space distance from the cursor in pixels
    pub distance_px: f64,
}

/// Find the nearest candidate vertex within `tolerance_px` of the cursor.
///
/// The sketch's own vertices are tested first (this is what lets a polygon
/// snap shut onto its first vertex), then every registered source in
/// registration order. Strictly-nearer candidates win; exact ties keep the
/// earlier source, which makes the result deterministic.
///
/// Returns `None` when nothing is in range - a snap miss is not an error,
/// the caller falls back to the raw cursor coordinate.
pub fn find_snap_target(
    cursor_px: DVec2,
    sketch: &[DVec2],
    sources: &SnapSources,
    tolerance_px: f64,
    project: impl Fn(DVec2) -> Option<DVec2>,
) -> Option<SnapTarget> {
    let mut best: Option<SnapTarget> = None;

    let mut consider = |coord: DVec2, source_index: Option<usize>| {
        let Some(px) = project(coord) else {
            return;
        };
        let distance_px = px.distance(cursor_px);
        if distance_px > tolerance_px {
            return;
        }
        let nearer = best.map(|b| distance_px < b.distance_px).unwrap_or(true);
        if nearer {
            best = Some(SnapTarget {
                coord,
                source_index,
                distance_px,
            });
        }
    };

    for &coord in sketch {
        consider(coord, None);
    }
    for (i, geometry) in sources.geometries().iter().enumerate() {
        for &coord in geometry {
            consider(coord, Some(i));
        }
    }

    best
}
