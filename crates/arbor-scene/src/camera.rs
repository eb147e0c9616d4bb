//! Camera and orbit navigation

use arbor_core::camera::{aspect_ratio, CameraPose, Perspective, INITIAL_EYE};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::controller::{place_asset, SceneController};
use crate::{from_core, to_core};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the camera and its controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            // Placement writes the restored pose after this frame's orbit step
            .add_systems(Update, (log_resize, update_camera.before(place_asset)));
    }
}

fn spawn_camera(mut commands: Commands) {
    let perspective = Perspective::default();
    let pose = CameraPose::looking_at(INITIAL_EYE, glam::Vec3::ZERO);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: perspective.fov_y_degrees.to_radians(),
            near: perspective.near,
            far: perspective.far,
            ..default()
        }),
        Transform {
            translation: from_core(pose.translation),
            rotation: Quat::from_array(pose.rotation.to_array()),
            ..default()
        },
        // The transition overlay is parented here
        Visibility::default(),
        MainCamera,
    ));
}

/// Bevy's camera system keeps the projection's aspect ratio in step with the
/// canvas; this only records the change
fn log_resize(mut resized: MessageReader<WindowResized>) {
    if let Some(last) = resized.read().last() {
        let aspect = aspect_ratio(last.width, last.height);
        tracing::debug!(width = last.width, height = last.height, aspect, "Viewport resized");
    }
}

/// Per-frame orbit update: feed input, apply damping, write the camera transform
fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut controller: ResMut<SceneController>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
) {
    let viewport_height = window.single().map(|w| w.height()).unwrap_or(720.0);
    let orbit = &mut controller.orbit;

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }
    if mouse_button.pressed(MouseButton::Left) && total_motion != Vec2::ZERO {
        orbit.rotate(glam::Vec2::new(total_motion.x, total_motion.y), viewport_height);
    }

    for scroll in mouse_wheel.read() {
        let steps = match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / 100.0,
        };
        orbit.zoom(steps);
    }

    // One finger orbits, two fingers pinch-zoom
    let touches: Vec<_> = touch_input.iter().collect();
    match touches.as_slice() {
        [touch] => {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                orbit.rotate(glam::Vec2::new(delta.x, delta.y), viewport_height);
            }
        }
        [t1, t2] => {
            let curr = t1.position().distance(t2.position());
            let prev = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            if prev > 0.0 && curr > 0.0 && curr != prev {
                // 0.95^steps == prev / curr
                orbit.zoom((prev / curr).ln() / 0.95_f32.ln());
            }
        }
        _ => {}
    }

    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    let pose = orbit.update(CameraPose {
        translation: to_core(transform.translation),
        rotation: glam::Quat::from_array(transform.rotation.to_array()),
    });
    transform.translation = from_core(pose.translation);
    transform.rotation = Quat::from_array(pose.rotation.to_array());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResized;

    fn camera_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::input::InputPlugin))
            .add_message::<WindowResized>()
            .insert_resource(SceneController::new(0.0))
            .add_plugins(CameraPlugin);
        app.update();
        app
    }

    fn projection(app: &mut App) -> PerspectiveProjection {
        let mut cameras = app.world_mut().query_filtered::<&Projection, With<MainCamera>>();
        match cameras.single(app.world()).expect("one camera") {
            Projection::Perspective(perspective) => perspective.clone(),
            other => panic!("expected a perspective camera, got {:?}", other),
        }
    }

    #[test]
    fn test_camera_spawns_with_viewer_perspective() {
        let mut app = camera_app();
        let perspective = projection(&mut app);
        assert!((perspective.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(perspective.near, 0.1);
        assert_eq!(perspective.far, 1000.0);
    }

    #[test]
    fn test_resize_leaves_projection_to_bevy() {
        let mut app = camera_app();
        let before = projection(&mut app);

        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 300.0,
            height: 900.0,
        });
        app.update();

        // Without a render target nothing recomputes the aspect ratio
        assert_eq!(projection(&mut app).aspect_ratio, before.aspect_ratio);
    }
}
