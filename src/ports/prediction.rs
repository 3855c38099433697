//! Prediction port: Trait for the external prediction service.
//!
//! Abstracts the HTTP transport from the submission pipeline so the
//! application layer and the TUI can be exercised against a mock backend.

use crate::domain::{PredictionResult, TypedPatientInput};

/// Errors that can end a submission attempt.
///
/// Validation failures never reach this taxonomy; they are caught before the
/// pipeline touches the backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmissionError {
    /// No endpoint address was configured. Checked before any network I/O.
    #[error("prediction endpoint is not configured (set CARDIOSCREEN_API_URL)")]
    NotConfigured,

    /// The server answered with a non-2xx status. Carries the server-provided
    /// message when the body had one, otherwise a generic failure text.
    #[error("{0}")]
    Server(String),

    /// The response body did not match the result schema.
    #[error("malformed prediction response: {0}")]
    ResponseShape(String),

    /// The request never completed (connect, TLS, or timeout failure).
    #[error("request failed: {0}")]
    Transport(String),

    /// A submission is already outstanding for this form instance.
    #[error("a submission is already in flight")]
    InFlight,
}

/// Trait for the remote prediction service.
///
/// `predict` blocks the calling thread until the service answers; callers
/// that must stay responsive run it on a worker thread.
pub trait PredictionBackend: Send + Sync {
    /// Send one typed patient record and return the parsed, shape-checked
    /// result.
    ///
    /// # Errors
    /// Returns `SubmissionError::NotConfigured` without any network call when
    /// no endpoint is set; otherwise the transport, server, or shape error
    /// that ended the attempt.
    fn predict(&self, input: &TypedPatientInput) -> Result<PredictionResult, SubmissionError>;

    /// Whether an endpoint address is configured (for status display).
    fn is_configured(&self) -> bool;
}
