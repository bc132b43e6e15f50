use bevy::camera::visibility::RenderLayers;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Marker for the map canvas camera.
///
/// The camera looks at a plate-carrée world: one world unit is one degree,
/// x is longitude and y is latitude. This is the stand-in for the host
/// basemap surface; everything outside this module only ever exchanges
/// lon/lat map coordinates and viewport pixels with it.
#[derive(Component)]
pub struct MapCamera;

#[derive(Component)]
pub struct CameraZoom {
    /// Degrees per pixel
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 0.01 }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        CameraZoom::default(),
        // Start over Bengaluru, a convenient default for eyeballing
        // geodesic output against known distances.
        Transform::from_translation(Vec3::new(77.59, 12.97, 1000.0)),
        // Layer 0 = basemap content, layer 1 = sketch overlay
        RenderLayers::from_layers(&[0, 1]),
    ));
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<bevy::input::mouse::MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<MapCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraZoom, With<MapCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let steps = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };

        // Multiplicative zoom keeps steps uniform across the large range
        // between street level and whole-country views.
        zoom.scale = (zoom.scale * 0.9_f32.powf(steps)).clamp(1e-5, 0.5);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<MapCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}
