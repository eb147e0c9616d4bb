//! Arbor Core - Renderer-independent logic for the plant viewer
//!
//! This crate provides everything that does not need a browser or a GPU:
//! - Environmental readings and their validation
//! - Classification labels and the label-to-asset catalog
//! - Request/response bodies for the prediction service
//! - Overlay fades and the asset transition state machine
//! - Orbit camera math and asset framing
//! - The validate → classify → transition → recommend pipeline

pub mod api;
pub mod backdrop;
pub mod camera;
pub mod config;
pub mod fade;
pub mod framing;
pub mod label;
pub mod pipeline;
pub mod reading;
pub mod transition;

pub use api::{Endpoints, Recommendation, ServiceError};
pub use config::{ConfigError, ViewerConfig};
pub use label::{AssetCatalog, ClassificationLabel};
pub use pipeline::{AssetTransition, OutputSink, PipelineError, PredictionPipeline, PredictionService};
pub use reading::{EnvironmentalReading, RawReading, ReadingError};
pub use transition::{AssetLoadError, TransitionDriver, TransitionEvent};
