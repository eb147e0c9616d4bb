//! Bevy application setup

use arbor_core::ViewerConfig;
use arbor_scene::{ArborScenePlugin, SceneSettings, TransitionQueue};
use bevy::prelude::*;

/// Build and start the viewer; on wasm this returns once the event loop is scheduled
pub fn run(config: &ViewerConfig, canvas_selector: String, queue: TransitionQueue) {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Arbor - Plant Viewer".to_string(),
                        canvas: Some(canvas_selector),
                        fit_canvas_to_parent: true,
                        // Leave input fields on the host page usable
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Models are served next to index.html
                    file_path: "".to_string(),
                    // Don't look for .meta files - the host doesn't have them
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        .add_plugins(ArborScenePlugin {
            settings: SceneSettings::from(config),
            queue,
        })
        .run();
}
