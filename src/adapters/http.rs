//! HTTP adapter for the remote prediction service.
//!
//! One POST per submission, JSON body, JSON result. The endpoint address is
//! explicit configuration injected at construction so tests can supply it
//! deterministically instead of mutating process environment.

use std::time::Duration;

use reqwest::StatusCode;

use crate::domain::{PredictionResult, TypedPatientInput};
use crate::ports::{PredictionBackend, SubmissionError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpPredictionClient`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Full URL of the prediction endpoint. `None` means unconfigured;
    /// submissions fail fast without touching the network.
    pub endpoint: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpConfig {
    /// Read configuration from the environment (composition root only).
    ///
    /// `CARDIOSCREEN_API_URL` supplies the endpoint;
    /// `CARDIOSCREEN_HTTP_TIMEOUT_SECS` overrides the 30s default.
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint = std::env::var("CARDIOSCREEN_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let timeout = std::env::var("CARDIOSCREEN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            endpoint,
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Configuration pointing at a known endpoint, with the default timeout.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Explicitly unconfigured (no endpoint).
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Blocking reqwest client implementing the prediction port.
///
/// Blocking is deliberate: the TUI drives submissions from a worker thread,
/// so the request may suspend its own thread without freezing the interface.
pub struct HttpPredictionClient {
    client: reqwest::blocking::Client,
    config: HttpConfig,
}

impl HttpPredictionClient {
    /// Build a client with the given configuration.
    ///
    /// # Errors
    /// Returns `SubmissionError::Transport` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: HttpConfig) -> Result<Self, SubmissionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

impl PredictionBackend for HttpPredictionClient {
    fn predict(&self, input: &TypedPatientInput) -> Result<PredictionResult, SubmissionError> {
        // Missing configuration is a precondition failure: no network call.
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .ok_or(SubmissionError::NotConfigured)?;

        tracing::debug!("POSTing patient record to prediction endpoint");
        let response = self
            .client
            .post(endpoint)
            .json(input)
            .send()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }

    fn is_configured(&self) -> bool {
        self.config.endpoint.is_some()
    }
}

/// Turn a raw status + body into a typed result or submission error.
///
/// Split out of the transport path so the status and schema handling can be
/// tested without a live server.
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &[u8],
) -> Result<PredictionResult, SubmissionError> {
    if !status.is_success() {
        // The service reports failures as {"message": "..."} when it can.
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| format!("prediction request failed with status {status}"));
        return Err(SubmissionError::Server(message));
    }

    let result: PredictionResult = serde_json::from_slice(body)
        .map_err(|e| SubmissionError::ResponseShape(e.to_string()))?;
    result.check_shape().map_err(SubmissionError::ResponseShape)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Probability;

    fn typed_input() -> TypedPatientInput {
        TypedPatientInput {
            age: 57,
            sex: "1".into(),
            cp: "2".into(),
            trestbps: 130,
            chol: 236,
            fbs: "0".into(),
            restecg: "1".into(),
            thalach: 174,
            exang: "0".into(),
            oldpeak: 1.4,
            slope: "1".into(),
            ca: "0".into(),
            thal: "2".into(),
        }
    }

    #[test]
    fn unconfigured_endpoint_fails_before_any_network_call() {
        let client =
            HttpPredictionClient::new(HttpConfig::unconfigured()).expect("should build");
        assert!(!client.is_configured());
        let err = client.predict(&typed_input()).expect_err("should fail");
        assert!(matches!(err, SubmissionError::NotConfigured));
    }

    #[test]
    fn success_body_is_returned_unchanged() {
        let body = br#"{
            "prediction": 0,
            "probability": {"negative": 0.8, "positive": 0.2},
            "success": true,
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let result = interpret_response(StatusCode::OK, body).expect("should parse");
        assert_eq!(result.prediction, 0);
        assert_eq!(
            result.probability,
            Probability {
                negative: 0.8,
                positive: 0.2
            }
        );
        assert!(result.success);
        assert_eq!(result.timestamp, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn server_error_carries_server_message() {
        let body = br#"{"message": "model unavailable"}"#;
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, body)
            .expect_err("should fail");
        match err {
            SubmissionError::Server(msg) => assert_eq!(msg, "model unavailable"),
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[test]
    fn server_error_without_message_gets_generic_text() {
        let err = interpret_response(StatusCode::BAD_GATEWAY, b"oops").expect_err("should fail");
        match err {
            SubmissionError::Server(msg) => {
                assert!(msg.contains("502"), "unexpected message: {msg}");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_probability_is_a_shape_error() {
        let body = br#"{
            "prediction": 1,
            "probability": {"negative": -0.4, "positive": 1.4},
            "success": true,
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let err = interpret_response(StatusCode::OK, body).expect_err("should fail");
        assert!(matches!(err, SubmissionError::ResponseShape(_)));
    }

    #[test]
    fn undecodable_body_is_a_shape_error() {
        let err =
            interpret_response(StatusCode::OK, b"<html>not json</html>").expect_err("should fail");
        assert!(matches!(err, SubmissionError::ResponseShape(_)));
    }

    #[test]
    fn wrong_field_types_are_a_shape_error() {
        let body = br#"{
            "prediction": "zero",
            "probability": {"negative": 0.8, "positive": 0.2},
            "success": true,
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let err = interpret_response(StatusCode::OK, body).expect_err("should fail");
        assert!(matches!(err, SubmissionError::ResponseShape(_)));
    }
}
