//! Prediction pipeline: validate → classify → transition → recommend
//!
//! Each stage sits behind a trait so the browser wiring (HTTP, DOM, Bevy) can
//! be swapped for scripted fakes in tests. A stage failure aborts the stages
//! after it and is reported on the page's recommendation output.

// The browser runs everything on one thread, so none of these futures are Send.
#![allow(async_fn_in_trait)]

use std::cell::Cell;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::{Recommendation, RecommendRequest, ServiceError};
use crate::label::{AssetCatalog, ClassificationLabel};
use crate::reading::{EnvironmentalReading, RawReading, ReadingError};
use crate::transition::AssetLoadError;

pub const THINKING_MESSAGE: &str = "Thinking of a recommendation...";
pub const NO_RECOMMENDATION_MESSAGE: &str = "No recommendation available.";

/// The remote classification/recommendation service
pub trait PredictionService {
    async fn classify(&self, reading: &EnvironmentalReading) -> Result<ClassificationLabel, ServiceError>;

    async fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, ServiceError>;
}

/// The scene's "load this asset" operation; resolves once the overlay has cleared
pub trait AssetTransition {
    async fn load_asset(&self, path: &str) -> Result<(), AssetLoadError>;
}

/// Text outputs on the host page
pub trait OutputSink {
    fn show_prediction(&self, text: &str);
    fn show_recommendation(&self, text: &str);
}

/// Pipeline stage, for reporting where a submission stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Classify,
    Transition,
    Recommend,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("a prediction is already in progress")]
    Busy,
    #[error("Invalid input: {0}")]
    InvalidReading(#[from] ReadingError),
    #[error("classification failed: {0}")]
    Classify(#[source] ServiceError),
    #[error("model transition failed: {0}")]
    Transition(#[from] AssetLoadError),
    #[error("recommendation failed: {0}")]
    Recommend(#[source] ServiceError),
}

impl PipelineError {
    /// Stage that failed; `None` when the submission never started
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Busy => None,
            PipelineError::InvalidReading(_) => Some(Stage::Validate),
            PipelineError::Classify(_) => Some(Stage::Classify),
            PipelineError::Transition(_) => Some(Stage::Transition),
            PipelineError::Recommend(_) => Some(Stage::Recommend),
        }
    }

    /// Text for the recommendation output, if the page should show anything
    pub fn user_message(&self) -> Option<String> {
        match self {
            PipelineError::Busy => None,
            PipelineError::InvalidReading(e) => Some(format!("Invalid input: {}", e)),
            PipelineError::Recommend(ServiceError::Remote(msg)) => Some(format!("Error: {}", msg)),
            PipelineError::Classify(e) | PipelineError::Recommend(e) => {
                Some(format!("An error occurred: {}", e))
            }
            PipelineError::Transition(e) => Some(format!("An error occurred: {}", e)),
        }
    }
}

/// Everything a successful submission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub label: ClassificationLabel,
    pub asset: String,
    pub recommendation: Recommendation,
}

pub fn prediction_message(label: &ClassificationLabel) -> String {
    format!("Prediction: {}", label)
}

pub fn recommendation_message(recommendation: &Recommendation) -> String {
    match recommendation {
        Recommendation::Text(text) => format!("Recommendation: {}", text),
        Recommendation::Unavailable => NO_RECOMMENDATION_MESSAGE.to_string(),
    }
}

pub struct PredictionPipeline<S, T, O> {
    service: S,
    scene: T,
    output: O,
    catalog: AssetCatalog,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag however the submission ends
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S, T, O> PredictionPipeline<S, T, O>
where
    S: PredictionService,
    T: AssetTransition,
    O: OutputSink,
{
    pub fn new(service: S, scene: T, output: O, catalog: AssetCatalog) -> Self {
        Self {
            service,
            scene,
            output,
            catalog,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Run one submission end to end, writing progress and errors to the page
    pub async fn submit(&self, raw: &RawReading) -> Result<PipelineOutcome, PipelineError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("Submission ignored, a prediction is already in progress");
            return Err(PipelineError::Busy);
        };

        let result = self.run(raw).await;

        match &result {
            Ok(outcome) => {
                info!(label = %outcome.label, asset = %outcome.asset, "Prediction complete");
            }
            Err(e) => {
                error!(stage = ?e.stage(), error = %e, "Prediction failed");
                if let Some(message) = e.user_message() {
                    self.output.show_recommendation(&message);
                }
            }
        }

        result
    }

    async fn run(&self, raw: &RawReading) -> Result<PipelineOutcome, PipelineError> {
        let reading = raw.parse()?;
        debug!(?reading, "Sending reading for prediction");

        let label = self
            .service
            .classify(&reading)
            .await
            .map_err(PipelineError::Classify)?;
        info!(label = %label, "Received prediction");
        self.output.show_prediction(&prediction_message(&label));

        let asset = self.catalog.asset_for(&label).to_string();
        self.scene.load_asset(&asset).await?;

        self.output.show_recommendation(THINKING_MESSAGE);

        let request = RecommendRequest::new(reading, &label);
        let recommendation = self
            .service
            .recommend(&request)
            .await
            .map_err(PipelineError::Recommend)?;
        self.output.show_recommendation(&recommendation_message(&recommendation));

        Ok(PipelineOutcome {
            label,
            asset,
            recommendation,
        })
    }
}
