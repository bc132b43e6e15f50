//! Per-vertex measurement rows, summaries, and tab-separated export.
//!
//! Everything here is derived data: recomputed from the current ring on
//! every change, never stored alongside it.

use bevy::math::DVec2;

use crate::geodesy::{
    bearing, format_area, format_bearing, format_distance, ring_area, segment_length, AreaUnit,
    DistanceUnit,
};

/// One measurement table row per distinct ring vertex.
///
/// `distance_m` and `bearing_deg` describe the segment arriving from the
/// previous vertex and are `None` on the first row.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRow {
    /// 1-based vertex index as shown to the user
    pub index: usize,
    pub coord: DVec2,
    pub distance_m: Option<f64>,
    pub bearing_deg: Option<f64>,
}

/// Whole-feature measurement summary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureSummary {
    /// Sum of all segment lengths, including the closing segment when the
    /// ring is closed
    pub perimeter_m: f64,
    /// Enclosed area; `None` for open geometry
    pub area_m2: Option<f64>,
}

/// Derive one row per distinct vertex. The synthetic closing duplicate of
/// a closed ring gets no row; its segment still counts toward the
/// perimeter in [`summarize`].
pub fn measure_rows(ring: &[DVec2], closed: bool) -> Vec<MeasureRow> {
    let count = if closed && ring.len() >= 2 {
        ring.len() - 1
    } else {
        ring.len()
    };

    (0..count)
        .map(|i| {
            let coord = ring[i];
            let (distance_m, bearing_deg) = if i == 0 {
                (None, None)
            } else {
                (
                    Some(segment_length(ring[i - 1], coord)),
                    Some(bearing(ring[i - 1], coord)),
                )
            };
            MeasureRow {
                index: i + 1,
                coord,
                distance_m,
                bearing_deg,
            }
        })
        .collect()
}

/// Total perimeter and, for closed rings, enclosed area.
pub fn summarize(ring: &[DVec2], closed: bool) -> MeasureSummary {
    let perimeter_m = ring
        .windows(2)
        .map(|pair| segment_length(pair[0], pair[1]))
        .sum();
    let area_m2 = if closed { Some(ring_area(ring)) } else { None };
    MeasureSummary {
        perimeter_m,
        area_m2,
    }
}

/// Render rows and summary as the tab-separated table handed to the host's
/// copy/export hook.
///
/// Layout (verbatim contract): a header row
/// `#\tX\tY\tDistance(<unit>)\tBearing`, one row per vertex, a trailing
/// `Perimeter:` line and, when the ring is closed, an `Area:` line.
pub fn export_table(
    rows: &[MeasureRow],
    summary: &MeasureSummary,
    distance_unit: DistanceUnit,
    area_unit: AreaUnit,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "#\tX\tY\tDistance({})\tBearing\n",
        distance_unit.label()
    ));

    for row in rows {
        let distance = row
            .distance_m
            .map(|d| format_distance(d, distance_unit))
            .unwrap_or_default();
        let bearing = row.bearing_deg.map(format_bearing).unwrap_or_default();
        out.push_str(&format!(
            "{}\t{:.6}\t{:.6}\t{}\t{}\n",
            row.index, row.coord.x, row.coord.y, distance, bearing
        ));
    }

    out.push_str(&format!(
        "Perimeter: {}\n",
        format_distance(summary.perimeter_m, distance_unit)
    ));
    if let Some(area) = summary.area_m2 {
        out.push_str(&format!("Area: {}\n", format_area(area, area_unit)));
    }
    out
}
