//! Pointer and keyboard systems driving the draw session.
//!
//! These systems are the translation layer between bevy input and the
//! rendering-agnostic [`DrawSession`]: clicks become vertices (after snap
//! substitution), pointer motion becomes the live preview vertex, and the
//! finish/abort gestures map to state machine transitions.

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{
    DOUBLE_CLICK_SECS, DOUBLE_CLICK_TOLERANCE_PX, SNAP_TOLERANCE_PX, VERTEX_GRAB_TOLERANCE_PX,
};
use crate::sketch::{find_snap_target, DrawSession, GeometryKind, SketchPhase, SnapSources};

use super::params::{is_cursor_over_ui, MapCanvas};
use super::tools::CurrentTool;
use super::tools::SketchSettings;
use super::{
    CancelSketchRequest, NewSketchRequest, RedoRequest, SketchFinished, ToolCloseRequest,
    UndoRequest,
};

fn finish_sketch(session: &mut DrawSession, finished: &mut MessageWriter<SketchFinished>) {
    session.finish();
    if let Some(geometry) = session.geojson() {
        finished.write(SketchFinished { geometry });
    }
}

/// Whether a click at `now`/`px` forms a double-click with a previous
/// click at `prev_t`/`prev_px`.
fn is_double_click(prev_t: f64, prev_px: DVec2, now: f64, px: DVec2) -> bool {
    now - prev_t <= DOUBLE_CLICK_SECS && prev_px.distance(px) <= DOUBLE_CLICK_TOLERANCE_PX
}

/// Left click commits a vertex (snapped when enabled and a target is in
/// range); a double-click or right click supplies the finish gesture for
/// multi-vertex geometry. Point and Rectangle finish themselves on their
/// final click.
#[allow(clippy::too_many_arguments)]
pub fn handle_sketch_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    mut session: ResMut<DrawSession>,
    settings: Res<SketchSettings>,
    snap_sources: Res<SnapSources>,
    canvas: MapCanvas,
    time: Res<Time>,
    mut last_click: Local<Option<(f64, DVec2)>>,
    mut finished: MessageWriter<SketchFinished>,
    mut contexts: EguiContexts,
) {
    if !current_tool.tool.is_draw_tool() {
        return;
    }

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(map_pos) = canvas.cursor_map_pos() else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) {
        // A grab by the vertex-drag system takes priority over starting
        // the next sketch with the same click.
        if session.dragging_vertex().is_some() {
            return;
        }

        // The second click of a double-click finishes instead of
        // committing a coincident duplicate vertex.
        let now = time.elapsed_secs_f64();
        if session.phase() == SketchPhase::Sketching
            && matches!(
                session.kind(),
                GeometryKind::LineString | GeometryKind::Polygon
            )
            && let (Some(px), Some((prev_t, prev_px))) =
                (canvas.cursor_viewport_pos(), *last_click)
            && is_double_click(prev_t, prev_px, now, px)
        {
            *last_click = None;
            finish_sketch(&mut session, &mut finished);
            return;
        }

        // Clicking after a finish starts the next feature with the same tool
        if session.phase() != SketchPhase::Sketching
            && let Some(kind) = current_tool.tool.geometry_kind()
        {
            session.begin(kind);
        }

        let coord = if settings.snap_enabled {
            canvas
                .cursor_viewport_pos()
                .and_then(|px| {
                    find_snap_target(
                        px,
                        session.active_coords(),
                        &snap_sources,
                        SNAP_TOLERANCE_PX,
                        |c| canvas.map_to_viewport(c),
                    )
                })
                .map(|target| {
                    debug!(
                        "snapped to source {:?} at {:.1} px",
                        target.source_index, target.distance_px
                    );
                    target.coord
                })
                // Snap miss: fall back to the raw cursor coordinate
                .unwrap_or(map_pos)
        } else {
            map_pos
        };

        session.add_vertex(coord);
        *last_click = canvas.cursor_viewport_pos().map(|px| (now, px));

        if session.phase() == SketchPhase::Finished {
            if let Some(geometry) = session.geojson() {
                finished.write(SketchFinished { geometry });
            }
        }
    }

    if mouse_button.just_pressed(MouseButton::Right)
        && session.phase() == SketchPhase::Sketching
    {
        finish_sketch(&mut session, &mut finished);
    }
}

/// Track the cursor with the live trailing vertex while sketching.
pub fn handle_preview_motion(mut session: ResMut<DrawSession>, canvas: MapCanvas) {
    if session.phase() != SketchPhase::Sketching {
        return;
    }
    if let Some(map_pos) = canvas.cursor_map_pos() {
        session.update_preview(map_pos);
    }
}

/// Grab and drag vertices of the finished feature.
pub fn handle_vertex_drag(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut session: ResMut<DrawSession>,
    canvas: MapCanvas,
    mut contexts: EguiContexts,
) {
    if session.phase() != SketchPhase::Finished {
        return;
    }

    if mouse_button.just_released(MouseButton::Left) {
        session.end_vertex_drag();
        return;
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        if is_cursor_over_ui(&mut contexts) {
            return;
        }
        let Some(cursor_px) = canvas.cursor_viewport_pos() else {
            return;
        };
        let grabbed = session
            .active_coords()
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| {
                canvas
                    .map_to_viewport(c)
                    .map(|px| (i, px.distance(cursor_px)))
            })
            .filter(|(_, d)| *d <= VERTEX_GRAB_TOLERANCE_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((index, _)) = grabbed {
            session.begin_vertex_drag(index);
        }
    } else if mouse_button.pressed(MouseButton::Left) && session.dragging_vertex().is_some() {
        if let Some(map_pos) = canvas.cursor_map_pos() {
            session.update_vertex_drag(map_pos);
        }
    }
}

/// Keyboard contract: Enter finishes, Escape aborts (and asks the host to
/// close the tool), Backspace removes the last placed vertex, Ctrl+Z /
/// Ctrl+Y / Ctrl+Shift+Z drive history.
pub fn handle_sketch_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<DrawSession>,
    mut finished: MessageWriter<SketchFinished>,
    mut close: MessageWriter<ToolCloseRequest>,
    mut contexts: EguiContexts,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Z (without shift) = undo
    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) {
        session.undo();
    }

    // Ctrl+Y or Ctrl+Shift+Z = redo
    if (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ))
    {
        session.redo();
    }

    if keyboard.just_pressed(KeyCode::Enter) && session.phase() == SketchPhase::Sketching {
        finish_sketch(&mut session, &mut finished);
    }

    if keyboard.just_pressed(KeyCode::Backspace) {
        session.remove_last_vertex();
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        session.cancel();
        close.write(ToolCloseRequest);
    }
}

/// Consume the host-facing request messages. All of them are safe in any
/// state; the session no-ops where a request does not apply.
pub fn handle_host_requests(
    mut undo_events: MessageReader<UndoRequest>,
    mut redo_events: MessageReader<RedoRequest>,
    mut cancel_events: MessageReader<CancelSketchRequest>,
    mut new_events: MessageReader<NewSketchRequest>,
    mut session: ResMut<DrawSession>,
    mut close: MessageWriter<ToolCloseRequest>,
) {
    for _ in undo_events.read() {
        session.undo();
    }
    for _ in redo_events.read() {
        session.redo();
    }
    for _ in cancel_events.read() {
        session.cancel();
        close.write(ToolCloseRequest);
    }
    for _ in new_events.read() {
        session.reset();
    }
}

/// Log finished geometry as it leaves the engine.
pub fn log_finished_sketches(mut events: MessageReader<SketchFinished>) {
    for event in events.read() {
        info!("geometry committed: {}", event.geometry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_within_thresholds() {
        let px = DVec2::new(400.0, 300.0);
        assert!(is_double_click(1.0, px, 1.2, px + DVec2::new(2.0, 1.0)));
    }

    #[test]
    fn test_slow_second_click_is_not_a_double_click() {
        let px = DVec2::new(400.0, 300.0);
        assert!(!is_double_click(1.0, px, 1.0 + DOUBLE_CLICK_SECS + 0.05, px));
    }

    #[test]
    fn test_far_second_click_is_not_a_double_click() {
        let px = DVec2::new(400.0, 300.0);
        let moved = px + DVec2::new(DOUBLE_CLICK_TOLERANCE_PX + 1.0, 0.0);
        assert!(!is_double_click(1.0, px, 1.1, moved));
    }

    #[test]
    fn test_double_click_thresholds_are_inclusive() {
        let px = DVec2::new(0.0, 0.0);
        let at_edge = DVec2::new(DOUBLE_CLICK_TOLERANCE_PX, 0.0);
        assert!(is_double_click(0.0, px, DOUBLE_CLICK_SECS, at_edge));
    }
}
