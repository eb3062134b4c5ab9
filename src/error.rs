//! Error taxonomy for the submission workflow
//!
//! Input errors never leave the client. Submission errors cover everything
//! that can go wrong once a request has been handed to the processing service.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Shown when neither the server nor the transport produced any text
pub const GENERIC_FAILURE_MESSAGE: &str = "processing failed";

/// Problems with user-supplied input, recovered locally with a warning
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Please select a valid image file ({file_name} is {mime_type})")]
    NotAnImage {
        file_name: String,
        mime_type: String,
    },

    #[error("Could not read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Please select both a character image and a reference image")]
    MissingImages,
}

/// Failure outcomes of a single submission
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("request failed with status code {status}")]
    Status {
        status: u16,
        /// `message` field of the error body, if the server sent one
        message: Option<String>,
    },

    #[error("response body could not be parsed: {0}")]
    Decode(String),
}

impl SubmitError {
    /// Message supplied by the server in the error body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SubmitError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Human-readable text for alerts and the session log.
    ///
    /// Server message first, then the error's own text, then a generic fallback.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }

        let own = self.to_string();
        if own.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            own
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SubmitError::Timeout(_))
    }
}
