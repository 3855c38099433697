//! Background submission worker.
//!
//! The HTTP round trip to the prediction service runs on its own thread so
//! the TUI event loop keeps polling input while a submission is outstanding.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::SubmissionService;
use crate::domain::{PredictionResult, TypedPatientInput};
use crate::ports::PredictionBackend;

/// Progress updates from a running submission.
#[derive(Debug, Clone)]
pub enum SubmissionProgress {
    /// Request handed to the backend.
    Sending,
    /// Submission resolved to a result.
    Complete(PredictionResult),
    /// Submission ended in an error; carries the display message.
    Failed(String),
}

/// Handle to a running submission worker.
pub struct SubmissionWorkerHandle {
    progress_rx: Receiver<SubmissionProgress>,
    _handle: JoinHandle<()>,
}

impl SubmissionWorkerHandle {
    /// Try to receive the next progress update without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<SubmissionProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Spawns submission attempts onto background threads.
pub struct SubmissionWorker;

impl SubmissionWorker {
    /// Run one submission attempt in the background.
    pub fn spawn<B>(
        service: Arc<SubmissionService<B>>,
        input: TypedPatientInput,
    ) -> SubmissionWorkerHandle
    where
        B: PredictionBackend + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(service, input, tx);
        });

        SubmissionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run<B>(
        service: Arc<SubmissionService<B>>,
        input: TypedPatientInput,
        tx: Sender<SubmissionProgress>,
    ) where
        B: PredictionBackend + 'static,
    {
        let _ = tx.send(SubmissionProgress::Sending);

        match service.submit(input) {
            Ok(result) => {
                let _ = tx.send(SubmissionProgress::Complete(result));
            }
            Err(e) => {
                let _ = tx.send(SubmissionProgress::Failed(e.to_string()));
            }
        }
    }
}
