//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the submission pipeline and the outside world (the remote
//! prediction service).

mod prediction;

pub use prediction::{PredictionBackend, SubmissionError};
