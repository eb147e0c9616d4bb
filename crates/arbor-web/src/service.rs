//! HTTP client for the prediction service

use arbor_core::api::{PredictResponse, RecommendRequest, RecommendResponse};
use arbor_core::{ClassificationLabel, Endpoints, EnvironmentalReading, Recommendation, ServiceError};
use arbor_core::pipeline::PredictionService;
use serde::de::DeserializeOwned;

/// Talks to `POST /predict` and `POST /recommend` with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    endpoints: Endpoints,
}

impl HttpPredictionService {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    #[cfg(target_arch = "wasm32")]
    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, ServiceError>
    where
        B: serde::Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_string(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

        let response = gloo_net::http::Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| ServiceError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        check_status(response.status(), &response.status_text())?;

        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        decode(&text)
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn post<B, R>(&self, url: &str, _body: &B) -> Result<R, ServiceError>
    where
        B: serde::Serialize,
        R: DeserializeOwned,
    {
        Err(ServiceError::Network(format!(
            "cannot reach {}: HTTP is only available in the browser build",
            url
        )))
    }
}

impl PredictionService for HttpPredictionService {
    async fn classify(&self, reading: &EnvironmentalReading) -> Result<ClassificationLabel, ServiceError> {
        tracing::debug!(url = %self.endpoints.predict, "POST predict");
        let response: PredictResponse = self.post(&self.endpoints.predict, reading).await?;
        Ok(response.label())
    }

    async fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, ServiceError> {
        tracing::debug!(url = %self.endpoints.recommend, prediction = %request.prediction, "POST recommend");
        let response: RecommendResponse = self.post(&self.endpoints.recommend, request).await?;
        response.into_result()
    }
}

/// Non-2xx responses are errors regardless of body
pub fn check_status(status: u16, status_text: &str) -> Result<(), ServiceError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        tracing::warn!(status, status_text, "Prediction service returned an error status");
        Err(ServiceError::HttpStatus {
            status,
            status_text: status_text.to_string(),
        })
    }
}

pub fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))
}
