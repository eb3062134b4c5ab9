//! Submission workflow
//!
//! Drives a single submission through
//! `Idle -> Validating -> Submitting -> Succeeded | Failed`.
//! The workflow is the only writer of the session's in-flight flag, and the
//! flag is cleared on every path out of `settle`.

use crate::error::{InputError, SubmitError};
use crate::model::{Alert, AssetSlot, ImageAsset, ProcessingResult, SessionState};
use crate::services::ProcessingService;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client-side deadline for one processing call
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(60_000);

pub const LOG_STARTED: &str = "processing started";
pub const LOG_UPLOADING: &str = "uploading images to processing service";
pub const LOG_COMPLETE: &str = "processing complete";
pub const LOG_FAILED: &str = "processing failed";

/// Lifecycle of the current submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl WorkflowState {
    /// Whether a new submission may be started from this state
    pub fn accepts_submission(&self) -> bool {
        matches!(
            self,
            WorkflowState::Idle | WorkflowState::Succeeded | WorkflowState::Failed
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::Validating => "Validating",
            WorkflowState::Submitting => "Processing",
            WorkflowState::Succeeded => "Complete",
            WorkflowState::Failed => "Failed",
        }
    }
}

/// Outbound payload: both images plus the prompt when it is non-empty
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub character: ImageAsset,
    pub reference: ImageAsset,
    pub prompt: Option<String>,
}

impl ProcessRequest {
    pub fn new(character: ImageAsset, reference: ImageAsset, prompt: &str) -> Self {
        Self {
            character,
            reference,
            prompt: (!prompt.is_empty()).then(|| prompt.to_string()),
        }
    }

    /// Multipart field names, in upload order
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = vec![
            AssetSlot::Character.form_field(),
            AssetSlot::Reference.form_field(),
        ];
        if self.prompt.is_some() {
            fields.push("prompt");
        }
        fields
    }
}

/// Await the service under a deadline; an expired deadline is a timeout failure
pub async fn call_with_deadline<S>(
    service: &S,
    request: &ProcessRequest,
    deadline: Duration,
) -> Result<ProcessingResult, SubmitError>
where
    S: ProcessingService + ?Sized,
{
    match tokio::time::timeout(deadline, service.process(request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SubmitError::Timeout(deadline)),
    }
}

/// State machine for one submission at a time
#[derive(Debug, Default)]
pub struct SubmissionWorkflow {
    state: WorkflowState,
}

impl SubmissionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Validate inputs and move into `Submitting`.
    ///
    /// Returns the request to send, or `None` if the submission was refused:
    /// either one is already in flight (no-op) or an image is missing
    /// (warning alert, back to `Idle`).
    pub fn begin(&mut self, session: &mut SessionState) -> Option<ProcessRequest> {
        if session.in_flight() || !self.state.accepts_submission() {
            debug!(state = ?self.state, "submission ignored while another is in flight");
            return None;
        }

        self.state = WorkflowState::Validating;

        let (Some(character), Some(reference)) = (
            session.asset(AssetSlot::Character).cloned(),
            session.asset(AssetSlot::Reference).cloned(),
        ) else {
            warn!("submission refused: missing image");
            session.raise_alert(Alert::warning(InputError::MissingImages.to_string()));
            self.state = WorkflowState::Idle;
            return None;
        };

        session.reset_for_submission();
        session.set_in_flight(true);
        session.append_log(LOG_STARTED);

        let request = ProcessRequest::new(character, reference, session.prompt());
        info!(
            character = %request.character.file_name,
            reference = %request.reference.file_name,
            has_prompt = request.prompt.is_some(),
            "submission started"
        );

        session.append_log(LOG_UPLOADING);
        self.state = WorkflowState::Submitting;
        Some(request)
    }

    /// Apply the outcome of the call started by [`begin`](Self::begin).
    ///
    /// A stray outcome arriving while nothing is submitting is ignored.
    pub fn settle(
        &mut self,
        session: &mut SessionState,
        outcome: Result<ProcessingResult, SubmitError>,
    ) -> WorkflowState {
        if self.state != WorkflowState::Submitting {
            warn!(state = ?self.state, "outcome received with no submission pending");
            return self.state;
        }

        match outcome {
            Ok(result) => {
                info!(
                    generated = result.generated_image_path.is_some(),
                    checks = result.validation_results.as_ref().map_or(0, |v| v.len()),
                    "processing complete"
                );
                session.set_result(result);
                session.append_log(LOG_COMPLETE);
                self.state = WorkflowState::Succeeded;
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, timed_out = err.is_timeout(), "processing failed");
                session.raise_alert(Alert::error(format!("Processing failed: {}", message)));
                session.append_log(format!("{}: {}", LOG_FAILED, message));
                self.state = WorkflowState::Failed;
            }
        }

        session.set_in_flight(false);
        self.state
    }
}
