//! Common SystemParam bundles for cursor and projection handling.
//!
//! The sketch engine works in lon/lat map coordinates while snapping and
//! vertex grabbing work in viewport pixels; every pointer system needs both
//! conversions. Bundling the camera and window queries here keeps those
//! systems under bevy's parameter limit and gives them convenient methods.

use bevy::ecs::system::SystemParam;
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::camera::MapCamera;

/// Bundled camera and window queries for pixel <-> map conversions
#[derive(SystemParam)]
pub struct MapCanvas<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<MapCamera>>,
}

impl MapCanvas<'_, '_> {
    /// Cursor position as a lon/lat map coordinate, if the cursor is over
    /// the window.
    pub fn cursor_map_pos(&self) -> Option<DVec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        let world = camera.viewport_to_world_2d(transform, cursor_pos).ok()?;
        Some(world.as_dvec2())
    }

    /// Raw cursor position in viewport pixels.
    pub fn cursor_viewport_pos(&self) -> Option<DVec2> {
        let window = self.window.single().ok()?;
        window.cursor_position().map(|p| p.as_dvec2())
    }

    /// Project a lon/lat map coordinate to viewport pixels. `None` when
    /// the coordinate is behind the camera or the camera is not ready.
    pub fn map_to_viewport(&self, coord: DVec2) -> Option<DVec2> {
        let (camera, transform) = self.camera.single().ok()?;
        let world = coord.as_vec2().extend(0.0);
        camera
            .world_to_viewport(transform, world)
            .ok()
            .map(|p| p.as_dvec2())
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
