//! GeoJSON serialization of finished geometry.

use bevy::math::DVec2;
use serde_json::{json, Value};

use super::ring::{CoordinateRing, GeometryKind};

fn position(c: DVec2) -> Value {
    json!([c.x, c.y])
}

/// Serialize a committed ring as a GeoJSON geometry object
/// (`{"type": ..., "coordinates": ...}`).
///
/// Rectangles serialize as ordinary polygons. Degenerate rings produce a
/// geometry with empty coordinates rather than an error; a point ring uses
/// its first coordinate.
pub fn geometry_json(kind: GeometryKind, ring: &CoordinateRing) -> Value {
    let coordinates = match kind {
        GeometryKind::Point => ring.first().map(position).unwrap_or_else(|| json!([])),
        GeometryKind::LineString => {
            Value::Array(ring.coords().iter().map(|&c| position(c)).collect())
        }
        GeometryKind::Polygon | GeometryKind::Rectangle => {
            if ring.is_empty() {
                json!([])
            } else {
                json!([ring.coords().iter().map(|&c| position(c)).collect::<Vec<_>>()])
            }
        }
    };

    json!({
        "type": kind.geojson_type(),
        "coordinates": coordinates,
    })
}
