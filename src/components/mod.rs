//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod alert_dialog;
pub mod form;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod log_panel;
pub mod quit_dialog;
pub mod results;

pub use alert_dialog::AlertDialog;
pub use form::FormComponent;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use log_panel::LogPanel;
pub use quit_dialog::QuitDialog;
pub use results::ResultsPanel;
