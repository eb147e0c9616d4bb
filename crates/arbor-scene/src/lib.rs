//! Arbor Scene - Bevy scene controller for the plant viewer
//!
//! Owns the viewport: camera and orbit controls, lighting, sky, ground, the
//! transition overlay, and the single displayed plant asset. The prediction
//! client talks to it only through [`SceneHandle`].

pub mod camera;
pub mod controller;
pub mod environment;
pub mod overlay;

use arbor_core::ViewerConfig;
use bevy::prelude::*;

pub use controller::{SceneController, SceneHandle, TransitionQueue, TransitionRequest};

/// Scene options derived from the viewer configuration
#[derive(Debug, Clone, Resource)]
pub struct SceneSettings {
    pub fade_ms: f64,
    pub initial_asset: String,
    pub ground_texture: Option<String>,
    pub shadows: bool,
}

impl From<&ViewerConfig> for SceneSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            fade_ms: config.transition.fade_ms,
            initial_asset: config.assets.initial_asset().to_string(),
            ground_texture: config.scene.ground_texture.clone(),
            shadows: config.scene.shadows,
        }
    }
}

/// Plugin that sets up the whole viewport
pub struct ArborScenePlugin {
    pub settings: SceneSettings,
    pub queue: TransitionQueue,
}

impl Plugin for ArborScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(self.queue.clone())
            .insert_resource(ClearColor(Color::srgb_u8(0x87, 0xCE, 0xEB)))
            .add_plugins(camera::CameraPlugin)
            .add_plugins(environment::EnvironmentPlugin)
            .add_plugins(overlay::OverlayPlugin)
            .add_plugins(controller::ControllerPlugin);
    }
}

pub(crate) fn to_core(v: Vec3) -> glam::Vec3 {
    glam::Vec3::from_array(v.to_array())
}

pub(crate) fn from_core(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}
