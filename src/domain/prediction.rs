//! Prediction result types returned by the remote model service.

use serde::{Deserialize, Serialize};

/// Risk classification derived from the model's binary prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Prediction 0: no significant indicators.
    Low,
    /// Any nonzero prediction: consultation advised.
    High,
}

impl RiskLevel {
    /// Human-readable description for the result view.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::High => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Class probabilities reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probability {
    /// Probability of the negative (no disease) class, in [0, 1].
    pub negative: f64,
    /// Probability of the positive (disease) class, in [0, 1].
    pub positive: f64,
}

/// Response body of the prediction endpoint.
///
/// Deserialization alone is not enough to trust the payload; call
/// [`PredictionResult::check_shape`] before handing it to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary prediction: 0 = low risk, nonzero = high risk.
    pub prediction: i64,
    pub probability: Probability,
    pub success: bool,
    /// Server-side timestamp; must parse as a date.
    pub timestamp: String,
}

impl PredictionResult {
    /// Validate the parsed body against the result schema.
    ///
    /// # Errors
    /// Returns a description of the first violation: a probability outside
    /// [0, 1] or an unparseable timestamp.
    pub fn check_shape(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.probability.negative) {
            return Err(format!(
                "probability.negative {} out of [0, 1]",
                self.probability.negative
            ));
        }
        if !(0.0..=1.0).contains(&self.probability.positive) {
            return Err(format!(
                "probability.positive {} out of [0, 1]",
                self.probability.positive
            ));
        }
        if !timestamp_parses(&self.timestamp) {
            return Err(format!("unparseable timestamp {:?}", self.timestamp));
        }
        Ok(())
    }

    /// Risk classification for display.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        if self.prediction == 0 {
            RiskLevel::Low
        } else {
            RiskLevel::High
        }
    }
}

/// Accept RFC 3339 plus the lenient date-only and space-separated formats
/// the prediction service has been seen emitting.
fn timestamp_parses(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
