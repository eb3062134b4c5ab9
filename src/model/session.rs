//! Session state - the single source of truth for one client run
//!
//! Every mutation is announced to subscribers as a [`SessionChange`], so the
//! view can be recomputed without reaching into the store on every frame.

use super::asset::{read_image, validate_image, AssetSlot, ImageAsset};
use super::log::LogAccumulator;
use super::result::ProcessingResult;
use crate::error::InputError;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

/// Severity of a blocking notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Error,
}

/// A blocking notification the user has to dismiss
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

/// Notification emitted after each state mutation
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    AssetSelected(AssetSlot),
    PromptChanged,
    LogAppended(u64),
    LogCleared,
    ResultChanged,
    InFlightChanged(bool),
    AlertRaised,
    AlertDismissed,
}

/// Mutable state of the current session
#[derive(Debug, Default)]
pub struct SessionState {
    character: Option<ImageAsset>,
    reference: Option<ImageAsset>,
    prompt: String,
    log: LogAccumulator,
    result: Option<ProcessingResult>,
    in_flight: bool,
    alert: Option<Alert>,
    subscribers: Vec<Sender<SessionChange>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<SessionChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, change: SessionChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assets
    // ─────────────────────────────────────────────────────────────────────────

    pub fn asset(&self, slot: AssetSlot) -> Option<&ImageAsset> {
        match slot {
            AssetSlot::Character => self.character.as_ref(),
            AssetSlot::Reference => self.reference.as_ref(),
        }
    }

    pub fn has_both_assets(&self) -> bool {
        self.character.is_some() && self.reference.is_some()
    }

    /// Store an asset in a slot, replacing whatever was there.
    ///
    /// Non-image assets are rejected with a warning alert and the slot keeps
    /// its previous value.
    pub fn select_image(&mut self, slot: AssetSlot, asset: ImageAsset) -> Result<(), InputError> {
        match validate_image(asset) {
            Ok(asset) => {
                debug!(slot = ?slot, file = %asset.file_name, "image selected");
                match slot {
                    AssetSlot::Character => self.character = Some(asset),
                    AssetSlot::Reference => self.reference = Some(asset),
                }
                self.emit(SessionChange::AssetSelected(slot));
                Ok(())
            }
            Err(err) => {
                self.reject_input(slot, &err);
                Err(err)
            }
        }
    }

    /// Read a file from disk into a slot, with the same rejection rules
    pub fn select_image_file(&mut self, slot: AssetSlot, path: &Path) -> Result<(), InputError> {
        match read_image(path) {
            Ok(asset) => self.select_image(slot, asset),
            Err(err) => {
                self.reject_input(slot, &err);
                Err(err)
            }
        }
    }

    fn reject_input(&mut self, slot: AssetSlot, err: &InputError) {
        warn!(slot = ?slot, error = %err, "rejected image selection");
        self.raise_alert(Alert::warning(err.to_string()));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Prompt
    // ─────────────────────────────────────────────────────────────────────────

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        if prompt != self.prompt {
            self.prompt = prompt;
            self.emit(SessionChange::PromptChanged);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Log
    // ─────────────────────────────────────────────────────────────────────────

    pub fn log(&self) -> &LogAccumulator {
        &self.log
    }

    pub fn append_log(&mut self, message: impl Into<String>) -> u64 {
        let id = self.log.append(message);
        self.emit(SessionChange::LogAppended(id));
        id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Result and submission lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Clear the log and the previous result ahead of a new submission
    pub(crate) fn reset_for_submission(&mut self) {
        self.log.reset();
        self.emit(SessionChange::LogCleared);
        if self.result.take().is_some() {
            self.emit(SessionChange::ResultChanged);
        }
    }

    pub(crate) fn set_result(&mut self, result: ProcessingResult) {
        self.result = Some(result);
        self.emit(SessionChange::ResultChanged);
    }

    /// Only the submission workflow writes this flag
    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        if self.in_flight != in_flight {
            self.in_flight = in_flight;
            self.emit(SessionChange::InFlightChanged(in_flight));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alerts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Show a blocking notification. A newer alert replaces an unread one.
    pub fn raise_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
        self.emit(SessionChange::AlertRaised);
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        let alert = self.alert.take();
        if alert.is_some() {
            self.emit(SessionChange::AlertDismissed);
        }
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImageAsset {
        ImageAsset::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_select_image_replaces_slot() {
        let mut session = SessionState::new();
        session.select_image(AssetSlot::Character, png("a.png")).unwrap();
        session.select_image(AssetSlot::Character, png("b.png")).unwrap();
        assert_eq!(session.asset(AssetSlot::Character).unwrap().file_name, "b.png");
        assert!(session.asset(AssetSlot::Reference).is_none());
        assert!(!session.has_both_assets());
    }

    #[test]
    fn test_non_image_keeps_previous_asset_and_warns() {
        for slot in AssetSlot::all() {
            let mut session = SessionState::new();
            session.select_image(slot, png("keep.png")).unwrap();

            let bad = ImageAsset::new("notes.txt", "text/plain", b"hello".to_vec());
            assert!(session.select_image(slot, bad).is_err());

            assert_eq!(session.asset(slot).unwrap().file_name, "keep.png");
            let alert = session.alert().expect("warning raised");
            assert_eq!(alert.level, AlertLevel::Warning);
        }
    }

    #[test]
    fn test_non_image_into_empty_slot_stays_empty() {
        let mut session = SessionState::new();
        let bad = ImageAsset::new("clip.mp4", "video/mp4", vec![0]);
        assert!(session.select_image(AssetSlot::Reference, bad).is_err());
        assert!(session.asset(AssetSlot::Reference).is_none());
        assert!(session.alert().is_some());
    }

    #[test]
    fn test_unreadable_file_warns() {
        let mut session = SessionState::new();
        let result = session.select_image_file(AssetSlot::Character, Path::new("/nope/missing.png"));
        assert!(matches!(result, Err(InputError::Unreadable { .. })));
        assert!(session.asset(AssetSlot::Character).is_none());
        assert!(session.alert().is_some());
    }

    #[test]
    fn test_subscribers_see_changes_in_order() {
        let mut session = SessionState::new();
        let rx = session.subscribe();

        session.select_image(AssetSlot::Reference, png("r.png")).unwrap();
        session.set_prompt("sunset beach");
        let id = session.append_log("hello");
        session.set_in_flight(true);
        session.set_in_flight(false);

        let changes: Vec<SessionChange> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                SessionChange::AssetSelected(AssetSlot::Reference),
                SessionChange::PromptChanged,
                SessionChange::LogAppended(id),
                SessionChange::InFlightChanged(true),
                SessionChange::InFlightChanged(false),
            ]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut session = SessionState::new();
        let rx = session.subscribe();
        drop(rx);
        session.set_prompt("x");
        assert!(session.subscribers.is_empty());
    }

    #[test]
    fn test_reset_for_submission_clears_log_and_result() {
        let mut session = SessionState::new();
        session.append_log("old entry");
        session.set_result(ProcessingResult::default());
        session.reset_for_submission();
        assert!(session.log().is_empty());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_dismiss_alert() {
        let mut session = SessionState::new();
        assert!(session.dismiss_alert().is_none());
        session.raise_alert(Alert::error("boom"));
        assert_eq!(session.dismiss_alert().unwrap().message, "boom");
        assert!(session.alert().is_none());
    }
}
