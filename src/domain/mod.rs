//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the raw patient form data, the field schema with
//! its validation rules, and the typed prediction result.

mod patient;
mod prediction;

pub use patient::{
    FieldErrors, FieldId, FieldKind, PatientInput, TypedPatientInput, FIELD_COUNT,
};
pub use prediction::{PredictionResult, Probability, RiskLevel};
