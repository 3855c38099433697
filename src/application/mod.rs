//! Application layer: Use cases and services.
//!
//! Orchestrates domain validation with the prediction port to implement the
//! submission pipeline.

mod submission;

pub use submission::SubmissionService;
