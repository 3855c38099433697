//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens: home (service status), patient data entry form, and the
//! submission/result view.

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::ClinicTheme;
pub use worker::{SubmissionProgress, SubmissionWorker, SubmissionWorkerHandle};
