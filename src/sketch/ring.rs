//! Coordinate rings and geometry kinds.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::geodesy::coords_equal_default;

/// The kind of geometry a sketch produces.
///
/// `Rectangle` is a constrained polygon: it is constructed from two anchor
/// clicks as an axis-aligned box and serialized as an ordinary closed
/// 4-corner ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryKind {
    #[default]
    Point,
    LineString,
    Polygon,
    Rectangle,
}

impl GeometryKind {
    /// Name used in GeoJSON output. Rectangles are plain polygons on the
    /// wire.
    pub fn geojson_type(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon | GeometryKind::Rectangle => "Polygon",
        }
    }

    /// Whether a committed ring of this kind is closed (last == first).
    pub fn closes_ring(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::Rectangle)
    }
}

/// An ordered sequence of `[longitude, latitude]` degree pairs.
///
/// Snapshots of a ring are plain deep clones; rings stay small (tens of
/// vertices), so full-copy history is cheaper to get right than deltas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateRing {
    coords: Vec<DVec2>,
}

impl CoordinateRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coords(coords: Vec<DVec2>) -> Self {
        Self { coords }
    }

    pub fn coords(&self) -> &[DVec2] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn first(&self) -> Option<DVec2> {
        self.coords.first().copied()
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<DVec2> {
        self.coords.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<DVec2> {
        self.coords.get(index).copied()
    }

    pub fn push(&mut self, coord: DVec2) {
        self.coords.push(coord);
    }

    /// Remove and return the last coordinate. No-op on an empty ring.
    pub fn pop(&mut self) -> Option<DVec2> {
        self.coords.pop()
    }

    pub fn clear(&mut self) {
        self.coords.clear();
    }

    /// Move one vertex. On a closed ring, moving either endpoint of the
    /// closing duplicate moves both so the ring stays closed.
    pub fn set_vertex(&mut self, index: usize, coord: DVec2) {
        let closed = self.is_closed();
        let len = self.coords.len();
        if let Some(c) = self.coords.get_mut(index) {
            *c = coord;
        } else {
            return;
        }
        if closed {
            if index == 0 {
                self.coords[len - 1] = coord;
            } else if index == len - 1 {
                self.coords[0] = coord;
            }
        }
    }

    /// True when the ring has at least two coordinates and the last equals
    /// the first within [`crate::constants::COORD_EPSILON`].
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(&first), Some(&last)) if self.coords.len() >= 2 => {
                coords_equal_default(first, last)
            }
            _ => false,
        }
    }

    /// Append a copy of the first coordinate if the ring is not already
    /// closed. No-op on rings with fewer than 3 vertices.
    pub fn close(&mut self) {
        if self.coords.len() >= 3 && !self.is_closed() {
            self.coords.push(self.coords[0]);
        }
    }

    /// Number of distinct vertices, not counting the closing duplicate.
    pub fn vertex_count(&self) -> usize {
        if self.is_closed() {
            self.coords.len() - 1
        } else {
            self.coords.len()
        }
    }
}

/// Build the closed 5-coordinate ring of the axis-aligned box spanned by
/// two opposite corners.
pub fn rectangle_ring(anchor: DVec2, opposite: DVec2) -> CoordinateRing {
    let min = anchor.min(opposite);
    let max = anchor.max(opposite);
    CoordinateRing::from_coords(vec![
        DVec2::new(min.x, min.y),
        DVec2::new(max.x, min.y),
        DVec2::new(max.x, max.y),
        DVec2::new(min.x, max.y),
        DVec2::new(min.x, min.y),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ring_not_closed() {
        assert!(!CoordinateRing::new().is_closed());
        let single = CoordinateRing::from_coords(vec![DVec2::ZERO]);
        assert!(!single.is_closed());
    }

    #[test]
    fn test_close_appends_first_coordinate() {
        let mut ring = CoordinateRing::from_coords(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
        ]);
        assert!(!ring.is_closed());
        ring.close();
        assert!(ring.is_closed());
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.vertex_count(), 3);
        // Closing twice is a no-op
        ring.close();
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_close_too_short_is_noop() {
        let mut ring = CoordinateRing::from_coords(vec![DVec2::ZERO, DVec2::new(1.0, 1.0)]);
        ring.close();
        assert_eq!(ring.len(), 2);
        assert!(!ring.is_closed());
    }

    #[test]
    fn test_set_vertex_keeps_closure() {
        let mut ring = rectangle_ring(DVec2::new(0.0, 0.0), DVec2::new(2.0, 3.0));
        ring.set_vertex(0, DVec2::new(-1.0, -1.0));
        assert!(ring.is_closed());
        assert_eq!(ring.last(), Some(DVec2::new(-1.0, -1.0)));
        ring.set_vertex(ring.len() - 1, DVec2::new(0.5, 0.5));
        assert_eq!(ring.first(), Some(DVec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_set_vertex_out_of_range_is_noop() {
        let mut ring = CoordinateRing::from_coords(vec![DVec2::ZERO]);
        ring.set_vertex(5, DVec2::new(1.0, 1.0));
        assert_eq!(ring.get(0), Some(DVec2::ZERO));
    }

    #[test]
    fn test_rectangle_ring_axis_aligned() {
        let ring = rectangle_ring(DVec2::new(2.0, 3.0), DVec2::new(0.0, 0.0));
        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed());
        let xs: Vec<f64> = ring.coords().iter().map(|c| c.x).collect();
        let ys: Vec<f64> = ring.coords().iter().map(|c| c.y).collect();
        assert_eq!(xs, vec![0.0, 2.0, 2.0, 0.0, 0.0]);
        assert_eq!(ys, vec![0.0, 0.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn test_geojson_type_names() {
        assert_eq!(GeometryKind::Point.geojson_type(), "Point");
        assert_eq!(GeometryKind::LineString.geojson_type(), "LineString");
        assert_eq!(GeometryKind::Polygon.geojson_type(), "Polygon");
        assert_eq!(GeometryKind::Rectangle.geojson_type(), "Polygon");
    }
}
