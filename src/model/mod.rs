//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `SessionState` - the session store (assets, prompt, log, result, flag)
//! - `ProcessingResult` - the service's response shape
//! - `ModalStack` - Modal overlay management

pub mod asset;
pub mod log;
pub mod modal;
pub mod result;
pub mod session;

// Re-export commonly used types
pub use asset::{AssetSlot, ImageAsset};
pub use log::LogAccumulator;
pub use result::ProcessingResult;
pub use session::{Alert, AlertLevel, SessionChange, SessionState};
