//! Overlay rendering for the sketch: ring geometry via gizmos and
//! positioned measurement labels via egui.
//!
//! Labels are a pure function of the current ring and the chosen units:
//! they are re-emitted every frame from [`DrawSession`], so a unit change
//! or a vertex drag relabels without touching any geometry.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::gizmos::prelude::*;
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::egui;
use bevy_egui::EguiContexts;

use crate::geodesy::{
    bearing, format_area, format_bearing_compact, format_distance, segment_length,
};
use crate::sketch::{rectangle_ring, DrawSession, GeometryKind, SketchPhase};

use super::camera::{CameraZoom, MapCamera};
use super::params::MapCanvas;
use super::tools::SketchSettings;

const STROKE_COLOR: Color = Color::srgb(1.0, 0.45, 0.0);
const MARKER_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);

/// Custom gizmo group for the sketch overlay (kept off the basemap layer)
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SketchGizmoGroup;

/// Configure the sketch gizmo group to render on the overlay layer only
pub fn configure_sketch_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SketchGizmoGroup>();
    config.render_layers = RenderLayers::layer(1);
}

/// Draw the active ring, the live preview segment, and vertex markers.
pub fn render_sketch_ring(
    mut gizmos: Gizmos<SketchGizmoGroup>,
    session: Res<DrawSession>,
    camera_query: Query<&CameraZoom, With<MapCamera>>,
) {
    let coords = session.active_coords();

    for pair in coords.windows(2) {
        gizmos.line_2d(pair[0].as_vec2(), pair[1].as_vec2(), STROKE_COLOR);
    }

    if session.phase() == SketchPhase::Sketching
        && let Some(preview) = session.preview()
    {
        match session.kind() {
            GeometryKind::Rectangle => {
                // Anchor placed: preview the whole box under the cursor
                if let Some(&anchor) = coords.first() {
                    let outline = rectangle_ring(anchor, preview);
                    for pair in outline.coords().windows(2) {
                        gizmos.line_2d(
                            pair[0].as_vec2(),
                            pair[1].as_vec2(),
                            STROKE_COLOR.with_alpha(0.5),
                        );
                    }
                }
            }
            _ => {
                if let Some(&last) = coords.last() {
                    gizmos.line_2d(
                        last.as_vec2(),
                        preview.as_vec2(),
                        STROKE_COLOR.with_alpha(0.5),
                    );
                }
                // Hint at the closing edge while a polygon takes shape
                if session.kind() == GeometryKind::Polygon && coords.len() >= 2 {
                    gizmos.line_2d(
                        preview.as_vec2(),
                        coords[0].as_vec2(),
                        STROKE_COLOR.with_alpha(0.25),
                    );
                }
            }
        }
    }

    // Vertex markers sized in screen space via the current zoom
    let marker_radius = camera_query.single().map(|z| z.scale).unwrap_or(0.01) * 4.0;
    for &coord in coords {
        gizmos.circle_2d(coord.as_vec2(), marker_radius, MARKER_COLOR);
    }
}

fn place_label(ctx: &egui::Context, id: egui::Id, pos: DVec2, text: egui::RichText) {
    egui::Area::new(id)
        .fixed_pos(egui::pos2(pos.x as f32, pos.y as f32))
        .pivot(egui::Align2::CENTER_CENTER)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(text);
        });
}

/// Emit distance/bearing labels at segment midpoints, 1-based vertex
/// indices for closed geometry, the enclosed-area label, and the live
/// cursor tooltip while sketching.
///
/// Renders nothing for rings shorter than two coordinates.
pub fn render_measure_labels(
    mut contexts: EguiContexts,
    canvas: MapCanvas,
    session: Res<DrawSession>,
    settings: Res<SketchSettings>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let coords = session.active_coords();

    if coords.len() >= 2 {
        let rows = session.measure_rows();
        for (i, row) in rows.iter().enumerate().skip(1) {
            let (Some(distance), Some(seg_bearing)) = (row.distance_m, row.bearing_deg) else {
                continue;
            };
            let midpoint = (coords[i - 1] + coords[i]) / 2.0;
            let Some(screen) = canvas.map_to_viewport(midpoint) else {
                continue;
            };
            let text = format!(
                "{} {}",
                format_distance(distance, settings.distance_unit),
                format_bearing_compact(seg_bearing)
            );
            place_label(
                ctx,
                egui::Id::new(("segment_label", i)),
                screen,
                egui::RichText::new(text)
                    .color(egui::Color32::WHITE)
                    .background_color(egui::Color32::from_black_alpha(160))
                    .size(12.0),
            );
        }

        // Closed geometry gets numbered vertices
        if session.kind().closes_ring() {
            for (i, row) in rows.iter().enumerate() {
                let Some(screen) = canvas.map_to_viewport(row.coord) else {
                    continue;
                };
                place_label(
                    ctx,
                    egui::Id::new(("vertex_index", i)),
                    screen + DVec2::new(0.0, -14.0),
                    egui::RichText::new(row.index.to_string())
                        .color(egui::Color32::YELLOW)
                        .size(11.0),
                );
            }
        }
    }

    // Area label at the vertex centroid once the ring is closed
    if let Some(area) = session.summary().area_m2
        && area > 0.0
        && !coords.is_empty()
    {
        let unique = &coords[..coords.len() - 1];
        let centroid = unique.iter().copied().sum::<DVec2>() / unique.len() as f64;
        if let Some(screen) = canvas.map_to_viewport(centroid) {
            place_label(
                ctx,
                egui::Id::new("area_label"),
                screen,
                egui::RichText::new(format_area(area, settings.area_unit))
                    .color(egui::Color32::WHITE)
                    .background_color(egui::Color32::from_black_alpha(200))
                    .size(13.0),
            );
        }
    }

    // Live tooltip tracking the cursor while sketching
    if session.phase() == SketchPhase::Sketching
        && let Some(preview) = session.preview()
        && let Some(&last) = coords.last()
        && let Some(cursor_px) = canvas.cursor_viewport_pos()
    {
        let segment = segment_length(last, preview);
        let total: f64 = coords
            .windows(2)
            .map(|p| segment_length(p[0], p[1]))
            .sum::<f64>()
            + segment;
        let text = format!(
            "{} {} (total {})",
            format_distance(segment, settings.distance_unit),
            format_bearing_compact(bearing(last, preview)),
            format_distance(total, settings.distance_unit)
        );
        place_label(
            ctx,
            egui::Id::new("sketch_tooltip"),
            cursor_px + DVec2::new(16.0, 18.0),
            egui::RichText::new(text)
                .color(egui::Color32::LIGHT_GRAY)
                .background_color(egui::Color32::from_black_alpha(160))
                .size(11.0),
        );
    }
}
