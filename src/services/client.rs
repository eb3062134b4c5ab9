//! HTTP client for the image-fusion service

use crate::error::SubmitError;
use crate::model::result::ErrorBody;
use crate::model::{AssetSlot, ImageAsset, ProcessingResult};
use crate::workflow::{ProcessRequest, REQUEST_TIMEOUT};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};

/// Path of the processing endpoint below the base URL
pub const PROCESS_PATH: &str = "/api/process";

/// Anything that can turn a submission into a processing result
#[async_trait]
pub trait ProcessingService: Send + Sync {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessingResult, SubmitError>;
}

/// Multipart client for `POST {base}/api/process`
pub struct HttpProcessingClient {
    client: Client,
    endpoint: String,
}

impl HttpProcessingClient {
    pub fn new(base_url: &str) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SubmitError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PROCESS_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn image_part(asset: &ImageAsset) -> Result<Part, SubmitError> {
        Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone())
            .mime_str(&asset.mime_type)
            .map_err(|e| SubmitError::Transport(format!("invalid content type {}: {}", asset.mime_type, e)))
    }

    fn build_form(request: &ProcessRequest) -> Result<Form, SubmitError> {
        let mut form = Form::new()
            .part(AssetSlot::Character.form_field(), Self::image_part(&request.character)?)
            .part(AssetSlot::Reference.form_field(), Self::image_part(&request.reference)?);

        if let Some(ref prompt) = request.prompt {
            form = form.text("prompt", prompt.clone());
        }

        Ok(form)
    }
}

/// Map a transport-level failure onto the submission taxonomy
fn classify(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        SubmitError::Timeout(REQUEST_TIMEOUT)
    } else {
        SubmitError::Transport(err.to_string())
    }
}

#[async_trait]
impl ProcessingService for HttpProcessingClient {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessingResult, SubmitError> {
        let form = Self::build_form(request)?;

        debug!(endpoint = %self.endpoint, fields = ?request.field_names(), "sending multipart request");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        info!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(SubmitError::Status {
                status: status.as_u16(),
                message,
            });
        }

        ProcessingResult::from_slice(&body).map_err(|e| SubmitError::Decode(e.to_string()))
    }
}
