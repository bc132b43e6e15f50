use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;
use serde::{Deserialize, Serialize};

use crate::geodesy::{AreaUnit, DistanceUnit};
use crate::sketch::{DrawSession, GeometryKind, SketchPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SketchTool {
    #[default]
    Select,
    Point,
    Line,
    Polygon,
    Rectangle,
}

impl SketchTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            SketchTool::Select => "Select (V)",
            SketchTool::Point => "Point (P)",
            SketchTool::Line => "Line (L)",
            SketchTool::Polygon => "Polygon (G)",
            SketchTool::Rectangle => "Rectangle (R)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            SketchTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            SketchTool::Point
            | SketchTool::Line
            | SketchTool::Polygon
            | SketchTool::Rectangle => CursorIcon::System(SystemCursorIcon::Crosshair),
        }
    }

    pub fn all() -> &'static [SketchTool] {
        &[
            SketchTool::Select,
            SketchTool::Point,
            SketchTool::Line,
            SketchTool::Polygon,
            SketchTool::Rectangle,
        ]
    }

    /// The geometry this tool sketches; `None` for Select.
    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        match self {
            SketchTool::Select => None,
            SketchTool::Point => Some(GeometryKind::Point),
            SketchTool::Line => Some(GeometryKind::LineString),
            SketchTool::Polygon => Some(GeometryKind::Polygon),
            SketchTool::Rectangle => Some(GeometryKind::Rectangle),
        }
    }

    pub fn is_draw_tool(&self) -> bool {
        self.geometry_kind().is_some()
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: SketchTool,
}

/// Live tool preferences. Mirrored into the persisted config whenever they
/// change; the host owns persistence, the engine just reads these.
#[derive(Resource)]
pub struct SketchSettings {
    pub snap_enabled: bool,
    pub distance_unit: DistanceUnit,
    pub area_unit: AreaUnit,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            distance_unit: DistanceUnit::default(),
            area_unit: AreaUnit::default(),
        }
    }
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyV) || keyboard.just_pressed(KeyCode::KeyS) {
        Some(SketchTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        Some(SketchTool::Point)
    } else if keyboard.just_pressed(KeyCode::KeyL) {
        Some(SketchTool::Line)
    } else if keyboard.just_pressed(KeyCode::KeyG) {
        Some(SketchTool::Polygon)
    } else if keyboard.just_pressed(KeyCode::KeyR) {
        Some(SketchTool::Rectangle)
    } else {
        None
    };

    if let Some(tool) = new_tool {
        current_tool.tool = tool;
    }
}

/// React to tool changes from any source (keyboard, toolbar buttons):
/// selecting a draw tool starts a fresh draw session for its geometry,
/// leaving for Select aborts a half-drawn sketch.
pub fn apply_tool_changes(
    current_tool: Res<CurrentTool>,
    mut session: ResMut<DrawSession>,
    mut previous: Local<SketchTool>,
) {
    if !current_tool.is_changed() || current_tool.tool == *previous {
        return;
    }
    *previous = current_tool.tool;

    match current_tool.tool.geometry_kind() {
        Some(kind) => session.begin(kind),
        None => {
            if session.phase() == SketchPhase::Sketching {
                session.cancel();
            }
        }
    }
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor over the map
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}
