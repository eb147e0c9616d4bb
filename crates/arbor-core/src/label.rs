//! Classification labels and the label-to-asset catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category string returned by the classification endpoint.
///
/// The raw text is kept verbatim so it can be echoed back to the
/// recommendation endpoint unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassificationLabel(String);

/// Labels the catalog knows how to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownLabel {
    Sustainable,
    Moderate,
    Unsustainable,
}

impl ClassificationLabel {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match against the known categories
    pub fn known(&self) -> Option<KnownLabel> {
        match self.0.as_str() {
            "Sustainable" => Some(KnownLabel::Sustainable),
            "Moderate" => Some(KnownLabel::Moderate),
            "Unsustainable" => Some(KnownLabel::Unsustainable),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassificationLabel {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Asset paths for each plant condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCatalog {
    /// Shown for "Unsustainable"
    #[serde(default = "default_unsustainable")]
    pub unsustainable: String,
    /// Shown for "Moderate"
    #[serde(default = "default_moderate")]
    pub moderate: String,
    /// Shown for "Sustainable" and any unrecognized label
    #[serde(default = "default_healthy")]
    pub healthy: String,
    /// Displayed when the session starts; defaults to the healthy asset
    #[serde(default)]
    pub initial: Option<String>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            unsustainable: default_unsustainable(),
            moderate: default_moderate(),
            healthy: default_healthy(),
            initial: None,
        }
    }
}

fn default_unsustainable() -> String {
    "static/resources/realistic_hd_blue_jacaranda_4040.glb".to_string()
}

fn default_moderate() -> String {
    "static/resources/realistic_hd_blue_jacaranda_2840.glb".to_string()
}

fn default_healthy() -> String {
    "static/resources/realistic_hd_blue_jacaranda_940.glb".to_string()
}

impl AssetCatalog {
    /// Resolve the asset to display for a classification
    pub fn asset_for(&self, label: &ClassificationLabel) -> &str {
        match label.known() {
            Some(KnownLabel::Unsustainable) => &self.unsustainable,
            Some(KnownLabel::Moderate) => &self.moderate,
            Some(KnownLabel::Sustainable) => &self.healthy,
            None => {
                tracing::warn!(label = %label, "Unrecognized classification, showing healthy asset");
                &self.healthy
            }
        }
    }

    pub fn initial_asset(&self) -> &str {
        self.initial.as_deref().unwrap_or(&self.healthy)
    }
}
