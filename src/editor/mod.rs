//! Map canvas, input translation, and overlay rendering around the sketch
//! engine.
//!
//! ## Module Structure
//!
//! - [`camera`] - The map canvas camera (plate-carrée world, pan/zoom)
//! - [`params`] - SystemParam bundles for pixel <-> lon/lat conversion
//! - [`tools`] - [`SketchTool`] selection, shortcuts, settings
//! - [`pointer`] - Pointer/keyboard systems feeding the draw session
//! - [`labels`] - Gizmo ring rendering and positioned measurement labels

pub mod camera;
pub mod params;
mod pointer;
pub mod tools;

mod labels;

pub use camera::MapCamera;
pub use tools::{CurrentTool, SketchSettings, SketchTool};

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::sketch::{DrawSession, SnapSources};

/// Host request: undo the last committed change (or remove the last placed
/// vertex while actively sketching).
#[derive(Message)]
pub struct UndoRequest;

/// Host request: redo the most recently undone change.
#[derive(Message)]
pub struct RedoRequest;

/// Host request: abort the sketch / put the tool away.
#[derive(Message)]
pub struct CancelSketchRequest;

/// Host request: discard the current feature and all history.
#[derive(Message)]
pub struct NewSketchRequest;

/// Emitted when a sketch finishes, carrying the feature as a GeoJSON
/// geometry object.
#[derive(Message)]
pub struct SketchFinished {
    pub geometry: serde_json::Value,
}

/// Emitted when the engine wants the host to close the tool (after an
/// explicit cancel).
#[derive(Message)]
pub struct ToolCloseRequest;

/// Put the tool away when the engine asks for it.
fn handle_tool_close(
    mut events: MessageReader<ToolCloseRequest>,
    mut current_tool: ResMut<CurrentTool>,
) {
    for _ in events.read() {
        current_tool.tool = SketchTool::Select;
    }
}

/// Seed the snap registry with a reference geometry so snapping has
/// something to bite on besides the sketch itself. A real host replaces
/// this with its visible vector layers.
fn register_reference_geometries(mut sources: ResMut<SnapSources>) {
    sources.register(vec![
        DVec2::new(77.55, 12.95),
        DVec2::new(77.62, 12.95),
        DVec2::new(77.62, 13.00),
        DVec2::new(77.55, 13.00),
        DVec2::new(77.55, 12.95),
    ]);
}

pub struct SketchEditorPlugin;

impl Plugin for SketchEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentTool>()
            .init_resource::<SketchSettings>()
            .init_resource::<DrawSession>()
            .init_resource::<SnapSources>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<CancelSketchRequest>()
            .add_message::<NewSketchRequest>()
            .add_message::<SketchFinished>()
            .add_message::<ToolCloseRequest>()
            .init_gizmo_group::<labels::SketchGizmoGroup>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    labels::configure_sketch_gizmos,
                    register_reference_geometries,
                ),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                    handle_tool_close,
                    tools::apply_tool_changes,
                ),
            )
            .add_systems(
                Update,
                (
                    // Vertex grabbing must win over starting the next sketch
                    pointer::handle_vertex_drag,
                    pointer::handle_sketch_clicks,
                    pointer::handle_preview_motion,
                    pointer::handle_sketch_keys,
                    pointer::handle_host_requests,
                    pointer::log_finished_sketches,
                    labels::render_sketch_ring,
                )
                    .chain(),
            )
            .add_systems(EguiPrimaryContextPass, labels::render_measure_labels);
    }
}
