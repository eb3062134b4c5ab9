//! Background submission runner
//!
//! Runs the network call on a worker thread so the UI keeps drawing. The
//! outcome comes back over a channel and is applied on the UI thread when
//! polled, so session state is only ever touched from one thread.

use crate::error::SubmitError;
use crate::model::ProcessingResult;
use crate::services::ProcessingService;
use crate::workflow::{call_with_deadline, ProcessRequest, REQUEST_TIMEOUT};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

pub type SubmissionOutcome = Result<ProcessingResult, SubmitError>;

/// A submission whose outcome has not been collected yet
struct BackgroundSubmission {
    receiver: Receiver<SubmissionOutcome>,
    start_instant: Instant,
}

/// Runs at most one submission at a time
#[derive(Default)]
pub struct SubmissionRunner {
    job: Option<BackgroundSubmission>,
}

impl SubmissionRunner {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Time since the current submission was spawned
    pub fn elapsed(&self) -> Option<Duration> {
        self.job.as_ref().map(|j| j.start_instant.elapsed())
    }

    /// Start the call on a worker thread with its own single-threaded runtime
    pub fn spawn(&mut self, service: Arc<dyn ProcessingService>, request: ProcessRequest) {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    runtime.block_on(call_with_deadline(service.as_ref(), &request, REQUEST_TIMEOUT))
                }
                Err(e) => {
                    error!(error = %e, "failed to start submission runtime");
                    Err(SubmitError::Transport(format!("failed to start runtime: {}", e)))
                }
            };
            let _ = tx.send(outcome);
        });

        debug!("submission spawned");
        self.job = Some(BackgroundSubmission {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Collect the outcome if the call has settled.
    ///
    /// A worker that vanished without reporting counts as a transport failure.
    pub fn poll(&mut self) -> Option<SubmissionOutcome> {
        let job = self.job.as_ref()?;

        let outcome = match job.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(SubmitError::Transport(
                "submission worker exited before settling".to_string(),
            )),
        };

        self.job = None;
        Some(outcome)
    }
}
