//! Arbor Web - Browser frontend for the plant viewer
//!
//! Binds the host page (inputs, trigger, outputs), talks to the prediction
//! service over HTTP, and runs the Bevy scene in the page's mount element.

mod app;
pub mod page;
pub mod service;

use std::rc::Rc;

use arbor_core::{PredictionPipeline, ViewerConfig};
use arbor_scene::{SceneHandle, TransitionQueue};
use wasm_bindgen::prelude::*;

use crate::page::{HostPage, PageError};
use crate::service::HttpPredictionService;

/// Built-in viewer configuration
const DEFAULT_CONFIG: &str = include_str!("../viewer.toml");

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let config = load_config();

    // wgpu is noisy below WARN
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.logging.max_level())
            .build(),
    );

    if let Err(e) = start(config) {
        tracing::error!("Viewer failed to start: {}", e);
    }
}

/// Embedded defaults plus `?service=` / `?log=` overrides from the page URL
fn load_config() -> ViewerConfig {
    let mut config = ViewerConfig::from_toml_or_default(DEFAULT_CONFIG);
    if let Some(search) = web_sys::window().and_then(|w| w.location().search().ok()) {
        config.apply_query(&search);
    }
    config
}

fn start(config: ViewerConfig) -> Result<(), PageError> {
    let page = Rc::new(HostPage::from_window(config.page.clone())?);
    page.mount_canvas()?;

    let queue = TransitionQueue::default();
    let pipeline = Rc::new(PredictionPipeline::new(
        HttpPredictionService::new(config.service.endpoints()),
        SceneHandle::new(queue.clone()),
        page.output(),
        config.assets.clone(),
    ));
    tracing::info!("Prediction service at {}", config.service.base_url);

    let reader = page.clone();
    let bound = page.on_trigger(move || {
        let raw = reader.read_reading();
        let pipeline = pipeline.clone();
        wasm_bindgen_futures::spawn_local(async move {
            // Errors have already been written to the page
            let _ = pipeline.submit(&raw).await;
        });
    });
    if let Err(e) = bound {
        // The scene is still worth showing without the form
        tracing::warn!("Prediction trigger unavailable: {}", e);
    }

    app::run(&config, page.canvas_selector(), queue);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ViewerConfig::from_toml(DEFAULT_CONFIG).unwrap();
        let defaults = ViewerConfig::default();

        assert_eq!(config.service, defaults.service);
        assert_eq!(config.assets, defaults.assets);
        assert_eq!(config.page, defaults.page);
        assert_eq!(config.transition.fade_ms, 300.0);
        assert_eq!(config.logging.max_level(), tracing::Level::WARN);
        assert!(config.scene.ground_texture.is_some());
    }
}
