//! Submission service: validate a patient record and forward it to the
//! prediction backend.
//!
//! One attempt walks Idle → Validating → Requesting → Succeeded/Failed; a
//! failed attempt is never retried automatically. Only one submission may be
//! outstanding per service instance: a second call while one is in flight is
//! rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::{FieldErrors, PatientInput, PredictionResult, TypedPatientInput};
use crate::ports::{PredictionBackend, SubmissionError};

/// Orchestrates the validation and submission pipeline over a prediction
/// backend.
pub struct SubmissionService<B>
where
    B: PredictionBackend,
{
    backend: Arc<B>,
    in_flight: AtomicBool,
}

impl<B> SubmissionService<B>
where
    B: PredictionBackend,
{
    /// Create a service over the given backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Coerce and validate the raw form input.
    ///
    /// Field errors are local: they are surfaced inline and never sent over
    /// the network.
    ///
    /// # Errors
    /// Returns the per-field error record when any field is out of domain.
    pub fn validate(&self, input: &PatientInput) -> Result<TypedPatientInput, FieldErrors> {
        input.validate()
    }

    /// Submit a validated record to the prediction backend.
    ///
    /// Blocks the calling thread until the backend answers; the TUI runs
    /// this on a worker thread.
    ///
    /// # Errors
    /// Returns `SubmissionError::InFlight` when a submission is already
    /// outstanding, otherwise whatever error ended the attempt.
    pub fn submit(&self, input: TypedPatientInput) -> Result<PredictionResult, SubmissionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmissionError::InFlight);
        }

        tracing::info!("Submitting patient record to prediction service...");
        let result = self.backend.predict(&input);
        self.in_flight.store(false, Ordering::Release);

        match &result {
            Ok(r) => tracing::info!(
                "Prediction received: risk={}, p_positive={:.3}",
                r.risk_level(),
                r.probability.positive
            ),
            Err(e) => tracing::warn!("Submission failed: {e}"),
        }

        result
    }

    /// Whether a submission is currently outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether the backend has an endpoint configured (for status display).
    #[must_use]
    pub fn backend_configured(&self) -> bool {
        self.backend.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldId, Probability};
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;

    fn canned_result() -> PredictionResult {
        PredictionResult {
            prediction: 0,
            probability: Probability {
                negative: 0.8,
                positive: 0.2,
            },
            success: true,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn valid_input() -> PatientInput {
        let mut input = PatientInput::default();
        input.set(FieldId::Age, "57");
        input.set(FieldId::Trestbps, "130");
        input.set(FieldId::Chol, "236");
        input.set(FieldId::Thalach, "174");
        input.set(FieldId::Oldpeak, "1.4");
        input
    }

    /// Counts calls and answers with a fixed response.
    struct MockBackend {
        calls: AtomicUsize,
        response: Result<PredictionResult, SubmissionError>,
    }

    impl MockBackend {
        fn returning(response: Result<PredictionResult, SubmissionError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PredictionBackend for MockBackend {
        fn predict(
            &self,
            _input: &TypedPatientInput,
        ) -> Result<PredictionResult, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[test]
    fn valid_submission_resolves_to_backend_result() {
        let backend = Arc::new(MockBackend::returning(Ok(canned_result())));
        let service = SubmissionService::new(backend.clone());

        let typed = service.validate(&valid_input()).expect("should validate");
        let result = service.submit(typed).expect("should submit");

        assert_eq!(result, canned_result());
        assert_eq!(backend.calls(), 1);
        assert!(!service.is_in_flight());
    }

    #[test]
    fn invalid_input_never_reaches_the_backend() {
        let backend = Arc::new(MockBackend::returning(Ok(canned_result())));
        let service = SubmissionService::new(backend.clone());

        let mut input = valid_input();
        input.set(FieldId::Age, "17");
        let errors = service.validate(&input).expect_err("should reject");

        assert!(errors.get(FieldId::Age).is_some());
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn backend_errors_pass_through_and_release_the_flight_guard() {
        let backend = Arc::new(MockBackend::returning(Err(SubmissionError::Server(
            "model unavailable".to_string(),
        ))));
        let service = SubmissionService::new(backend);

        let typed = valid_input().validate().expect("should validate");
        let err = service.submit(typed.clone()).expect_err("should fail");
        match err {
            SubmissionError::Server(msg) => assert_eq!(msg, "model unavailable"),
            other => panic!("expected Server error, got {other:?}"),
        }

        // A failed attempt must not block the next user-initiated one.
        assert!(!service.is_in_flight());
        assert!(service.submit(typed).is_err());
    }

    /// Blocks inside `predict` until released, to hold a submission open.
    struct BlockingBackend {
        started: Sender<()>,
        release: Mutex<Receiver<()>>,
    }

    impl PredictionBackend for BlockingBackend {
        fn predict(
            &self,
            _input: &TypedPatientInput,
        ) -> Result<PredictionResult, SubmissionError> {
            self.started.send(()).expect("test channel");
            self.release
                .lock()
                .expect("test lock")
                .recv()
                .expect("test channel");
            Ok(canned_result())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let backend = Arc::new(BlockingBackend {
            started: started_tx,
            release: Mutex::new(release_rx),
        });
        let service = Arc::new(SubmissionService::new(backend));
        let typed = valid_input().validate().expect("should validate");

        let first = {
            let service = service.clone();
            let typed = typed.clone();
            std::thread::spawn(move || service.submit(typed))
        };

        // Wait until the first submission is inside the backend.
        started_rx.recv().expect("first submission should start");
        assert!(service.is_in_flight());

        let err = service.submit(typed).expect_err("should be rejected");
        assert!(matches!(err, SubmissionError::InFlight));

        release_tx.send(()).expect("test channel");
        let result = first.join().expect("worker thread").expect("should succeed");
        assert_eq!(result, canned_result());
        assert!(!service.is_in_flight());
    }
}
