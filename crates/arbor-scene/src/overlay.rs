//! Full-viewport black overlay used to hide asset swaps

use bevy::light::NotShadowCaster;
use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::controller::{place_asset, SceneController};

/// Marker component for the overlay quad
#[derive(Component)]
pub struct TransitionOverlay;

/// Distance in front of the camera; must stay beyond the near plane
const OVERLAY_DEPTH: f32 = 0.5;
/// Half extent of the quad, wide enough to cover any aspect at fov 75
const OVERLAY_HALF_SIZE: f32 = 50.0;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_overlay)
            .add_systems(Update, sync_overlay.after(place_asset));
    }
}

/// Parent a black quad to the camera so it always fills the view
fn spawn_overlay(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera: Query<Entity, With<MainCamera>>,
) {
    let Ok(camera) = camera.single() else {
        tracing::warn!("No camera to attach the transition overlay to");
        return;
    };

    let overlay = commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::new(Vec3::Z, Vec2::splat(OVERLAY_HALF_SIZE)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::BLACK.with_alpha(0.0),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                cull_mode: None,
                fog_enabled: false,
                ..default()
            })),
            Transform::from_xyz(0.0, 0.0, -OVERLAY_DEPTH),
            Visibility::Hidden,
            NotShadowCaster,
            TransitionOverlay,
        ))
        .id();
    commands.entity(camera).add_child(overlay);
}

/// Copy the driver's opacity onto the overlay material
fn sync_overlay(
    controller: Res<SceneController>,
    mut overlay: Query<(&MeshMaterial3d<StandardMaterial>, &mut Visibility), With<TransitionOverlay>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok((material, mut visibility)) = overlay.single_mut() else {
        return;
    };

    let opacity = controller.driver.opacity();
    let target = if opacity > 0.0 {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if *visibility != target {
        *visibility = target;
    }

    if let Some(material) = materials.get_mut(&material.0) {
        if material.base_color.alpha() != opacity {
            material.base_color.set_alpha(opacity);
        }
    }
}
