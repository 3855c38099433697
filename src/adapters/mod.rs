//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest-based client for the remote prediction service
//! - `sanitize`: identifier redaction for log output

pub mod http;
pub mod sanitize;

pub use http::{HttpConfig, HttpPredictionClient};
