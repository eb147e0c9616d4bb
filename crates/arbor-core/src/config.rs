//! Viewer configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::Endpoints;
use crate::label::AssetCatalog;
use crate::transition::DEFAULT_FADE_MS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub assets: AssetCatalog,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the prediction service
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl ServiceConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::from_base(&self.base_url)
    }

    /// Accepts either a full URL or a bare `host:port`
    pub fn from_address(addr: &str) -> Self {
        let base_url = if addr.starts_with("https://") || addr.starts_with("http://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", addr.trim_end_matches('/'))
        };
        Self { base_url }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Duration of each overlay fade in milliseconds
    #[serde(default = "default_fade_ms")]
    pub fade_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_ms: default_fade_ms(),
        }
    }
}

fn default_fade_ms() -> f64 {
    DEFAULT_FADE_MS
}

/// Element ids the viewer expects on the host page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub mount: String,
    pub canvas: String,
    pub temperature: String,
    pub humidity: String,
    pub light_intensity: String,
    pub co2_level: String,
    pub trigger: String,
    pub prediction_output: String,
    pub recommendation_output: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            mount: "model-container".to_string(),
            canvas: "arbor-canvas".to_string(),
            temperature: "temperature".to_string(),
            humidity: "humidity".to_string(),
            light_intensity: "light-intensity".to_string(),
            co2_level: "co2-level".to_string(),
            trigger: "simulate".to_string(),
            prediction_output: "prediction-result".to_string(),
            recommendation_output: "recommendation-output".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Optional grass texture tiled across the ground
    #[serde(default)]
    pub ground_texture: Option<String>,
    #[serde(default = "default_true")]
    pub shadows: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_texture: None,
            shadows: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl LoggingConfig {
    pub fn max_level(&self) -> tracing::Level {
        match self.level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse `content`, falling back to defaults when it is malformed
    pub fn from_toml_or_default(content: &str) -> Self {
        match Self::from_toml(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Invalid viewer configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `?service=` style overrides from a page query string
    pub fn apply_query(&mut self, search: &str) {
        if let Some(service) = parse_query_param(search, "service") {
            tracing::info!("Using prediction service from URL parameter: {}", service);
            self.service = ServiceConfig::from_address(&service);
        }
        if let Some(level) = parse_query_param(search, "log") {
            self.logging.level = level;
        }
    }
}

/// Look up a parameter in a `?a=b&c=d` search string
pub fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == param && !value.is_empty() {
                return Some(value.replace("%3A", ":").replace("%2F", "/"));
            }
        }
    }
    None
}
