//! Request and response bodies for the prediction service

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::ClassificationLabel;
use crate::reading::EnvironmentalReading;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, status_text: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("{0}")]
    Remote(String),
}

/// Fully-qualified endpoint URLs derived from the service base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub predict: String,
    pub recommend: String,
}

impl Endpoints {
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            predict: format!("{}/predict", base),
            recommend: format!("{}/recommend", base),
        }
    }
}

/// Response from `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
}

impl PredictResponse {
    pub fn label(&self) -> ClassificationLabel {
        ClassificationLabel::new(self.prediction.clone())
    }
}

/// Body for `POST /recommend`: the submitted reading plus the label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub reading: EnvironmentalReading,
    pub prediction: String,
}

impl RecommendRequest {
    pub fn new(reading: EnvironmentalReading, label: &ClassificationLabel) -> Self {
        Self {
            reading,
            prediction: label.as_str().to_string(),
        }
    }
}

/// Response from `POST /recommend`; the service sends both keys, one of them null
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What a recommendation response means for the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Text(String),
    Unavailable,
}

impl RecommendResponse {
    /// A non-empty recommendation wins, then a non-empty error
    pub fn into_result(self) -> Result<Recommendation, ServiceError> {
        match (non_empty(self.recommendation), non_empty(self.error)) {
            (Some(text), _) => Ok(Recommendation::Text(text)),
            (None, Some(error)) => Err(ServiceError::Remote(error)),
            (None, None) => Ok(Recommendation::Unavailable),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_base() {
        let e = Endpoints::from_base("http://127.0.0.1:5000");
        assert_eq!(e.predict, "http://127.0.0.1:5000/predict");
        assert_eq!(e.recommend, "http://127.0.0.1:5000/recommend");

        // Trailing slash
        let e = Endpoints::from_base("https://plants.example.com/api/");
        assert_eq!(e.predict, "https://plants.example.com/api/predict");
    }

    #[test]
    fn test_recommend_request_flattens_reading() {
        let reading = EnvironmentalReading::new(25.0, 60.0, 500.0, 400.0);
        let req = RecommendRequest::new(reading, &ClassificationLabel::new("Moderate"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "temperature": 25.0,
                "humidity": 60.0,
                "light_intensity": 500.0,
                "co2_level": 400.0,
                "prediction": "Moderate"
            })
        );
    }

    #[test]
    fn test_recommend_response_with_null_error() {
        let resp: RecommendResponse =
            serde_json::from_str(r#"{"recommendation": "Increase ventilation.", "error": null}"#).unwrap();
        assert_eq!(
            resp.into_result(),
            Ok(Recommendation::Text("Increase ventilation.".to_string()))
        );
    }

    #[test]
    fn test_recommend_response_error_only() {
        let resp: RecommendResponse = serde_json::from_str(r#"{"error": "rate limited"}"#).unwrap();
        assert_eq!(resp.into_result(), Err(ServiceError::Remote("rate limited".to_string())));
    }

    #[test]
    fn test_recommend_response_empty() {
        let resp: RecommendResponse =
            serde_json::from_str(r#"{"recommendation": "", "error": null}"#).unwrap();
        assert_eq!(resp.into_result(), Ok(Recommendation::Unavailable));
    }

    #[test]
    fn test_http_status_message_carries_code() {
        let err = ServiceError::HttpStatus {
            status: 500,
            status_text: "INTERNAL SERVER ERROR".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }
}
