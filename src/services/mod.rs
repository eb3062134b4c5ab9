//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - The image-fusion HTTP endpoint
//! - Background execution of a submission

pub mod client;
pub mod runner;

pub use client::{HttpProcessingClient, ProcessingService};
pub use runner::SubmissionRunner;
