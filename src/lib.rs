//! # Cardioscreen
//!
//! Terminal client for heart disease risk screening. Collects the 13 classic
//! risk-factor inputs, validates them against a fixed schema, forwards the
//! typed record to a remote prediction service over HTTP, and renders the
//! returned probability. The predictive model itself lives behind the
//! endpoint; this crate is the validation and submission pipeline plus its
//! interface.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient form data, field schema, prediction result)
//! - `ports`: Trait definition for the prediction service
//! - `adapters`: Concrete implementations (reqwest HTTP client, log redaction)
//! - `application`: The submission pipeline orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{
    FieldErrors, FieldId, PatientInput, PredictionResult, RiskLevel, TypedPatientInput,
};
pub use ports::SubmissionError;
