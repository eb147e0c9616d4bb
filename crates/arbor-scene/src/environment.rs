//! Scene setup - lights, sky dome and ground

use arbor_core::backdrop::{GroundLayout, SkyGradient};
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::light::NotShadowCaster;
use bevy::math::Affine2;
use bevy::prelude::*;

use crate::SceneSettings;

/// Marker component for the sun
#[derive(Component)]
pub struct SunLight;

/// Marker component for the sky dome
#[derive(Component)]
pub struct SkyDome;

/// Marker component for the ground plane
#[derive(Component)]
pub struct Ground;

/// Plugin for scene setup
pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_lighting, setup_sky, setup_ground));
    }
}

fn setup_lighting(mut commands: Commands, settings: Res<SceneSettings>) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    // Sun
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: settings.shadows,
            ..default()
        },
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        SunLight,
    ));

    // Soft fill from overhead, tinted like a clear sky
    commands.spawn((
        DirectionalLight {
            illuminance: 600.0,
            shadows_enabled: false,
            color: Color::hsl(216.0, 1.0, 0.6),
            ..default()
        },
        Transform::from_xyz(0.0, 50.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    // Warm bounce from the ground
    commands.spawn((
        DirectionalLight {
            illuminance: 300.0,
            shadows_enabled: false,
            color: Color::hsl(34.2, 1.0, 0.75),
            ..default()
        },
        Transform::from_xyz(0.0, -50.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
}

fn setup_sky(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let gradient = SkyGradient::default();
    let mut mesh = Sphere::new(gradient.radius).mesh().uv(32, 15);

    let colors: Vec<[f32; 4]> = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(|positions| positions.as_float3())
        .map(|positions| {
            positions
                .iter()
                .map(|p| {
                    let [r, g, b] = gradient.color_at(glam::Vec3::from_array(*p));
                    Color::srgb(r, g, b).to_linear().to_f32_array()
                })
                .collect()
        })
        .unwrap_or_default();
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            // Seen from inside
            cull_mode: None,
            fog_enabled: false,
            ..default()
        })),
        Transform::IDENTITY,
        NotShadowCaster,
        SkyDome,
    ));
}

fn setup_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
) {
    let layout = GroundLayout::default();
    let mut mesh = Plane3d::default()
        .mesh()
        .size(layout.size, layout.size)
        .subdivisions(layout.subdivisions)
        .build();

    // Break up the flat plane with a little relief
    let jittered: Option<Vec<[f32; 3]>> = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(|positions| positions.as_float3())
        .map(|positions| {
            positions
                .iter()
                .map(|&[x, y, z]| [x, y + layout.relief_at(x, z), z])
                .collect()
        });
    if let Some(positions) = jittered {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.compute_normals();
    }

    let texture = settings.ground_texture.as_ref().map(|path| {
        asset_server.load_with_settings(path.clone(), |s: &mut ImageLoaderSettings| {
            s.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                address_mode_u: ImageAddressMode::Repeat,
                address_mode_v: ImageAddressMode::Repeat,
                ..default()
            });
        })
    });
    let uv_transform = if texture.is_some() {
        Affine2::from_scale(Vec2::splat(layout.texture_repeat))
    } else {
        Affine2::IDENTITY
    };

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: if texture.is_some() {
                Color::WHITE
            } else {
                Color::srgb(0.33, 0.52, 0.22)
            },
            base_color_texture: texture,
            uv_transform,
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_xyz(0.0, layout.height, 0.0),
        Ground,
    ));

    tracing::debug!(size = layout.size, textured = settings.ground_texture.is_some(), "Ground ready");
}
