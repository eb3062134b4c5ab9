//! App - Root component that orchestrates the session and all sub-components
//!
//! The App owns the single [`SessionState`] and is the only place it is
//! mutated. The processing call runs on a worker thread; its outcome is
//! collected on `Tick` and applied here, on the UI thread.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, AlertDialog, FormComponent, HelpDialog, HomeRenderContext, LogPanel,
    QuitDialog, ResultsPanel,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{AssetSlot, SessionChange, SessionState};
use crate::render::{render_result, ResultView};
use crate::services::{ProcessingService, SubmissionRunner};
use crate::workflow::SubmissionWorkflow;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::{debug, info};

/// Main application state
pub struct App {
    pub should_quit: bool,
    config: Config,

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    session: SessionState,
    changes: Receiver<SessionChange>,
    workflow: SubmissionWorkflow,
    runner: SubmissionRunner,
    service: Arc<dyn ProcessingService>,
    view: ResultView,

    // ─────────────────────────────────────────────────────────────────────────
    // Components
    // ─────────────────────────────────────────────────────────────────────────
    modals: ModalStack,
    form: FormComponent,
    log_panel: LogPanel,
    results_panel: ResultsPanel,
    quit_dialog: QuitDialog,
    help_dialog: HelpDialog,
    alert_dialog: AlertDialog,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn ProcessingService>) -> App {
        let mut session = SessionState::new();
        let changes = session.subscribe();

        App {
            should_quit: false,
            config,
            session,
            changes,
            workflow: SubmissionWorkflow::new(),
            runner: SubmissionRunner::new(),
            service,
            view: ResultView::default(),
            modals: ModalStack::new(),
            form: FormComponent::new(),
            log_panel: LogPanel,
            results_panel: ResultsPanel::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            alert_dialog: AlertDialog,
        }
    }

    fn submit(&mut self) {
        if let Some(request) = self.workflow.begin(&mut self.session) {
            info!(fields = ?request.field_names(), "submitting to processing service");
            self.runner.spawn(Arc::clone(&self.service), request);
        }
    }

    fn pick_file(&mut self, slot: AssetSlot, path: &str) {
        // Rejections raise their own alert
        if let Err(err) = self.session.select_image_file(slot, Path::new(path.trim())) {
            debug!(slot = ?slot, error = %err, "file not loaded");
        }
    }

    fn collect_outcome(&mut self) {
        if let Some(outcome) = self.runner.poll() {
            let state = self.workflow.settle(&mut self.session, outcome);
            debug!(state = ?state, "submission settled");
        }
    }

    /// Drain session notifications and bring the derived view up to date
    fn sync_view(&mut self) {
        let mut dirty = false;
        while let Ok(change) = self.changes.try_recv() {
            match change {
                SessionChange::AlertRaised => {
                    if !self.modals.contains(&Modal::Alert) {
                        self.modals.push(Modal::Alert);
                    }
                }
                SessionChange::AlertDismissed => self.modals.remove(&Modal::Alert),
                SessionChange::ResultChanged => self.results_panel.reset_scroll(),
                _ => {}
            }
            dirty = true;
        }

        if dirty {
            self.view = render_result(
                self.session.asset(AssetSlot::Reference),
                self.session.result(),
                &self.config.api_base_url,
            );
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::Alert => self.alert_dialog.handle_key_event(key),
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::Alert => {
                if let Some(alert) = self.session.alert() {
                    self.alert_dialog.draw_with_alert(frame, area, alert)?;
                }
            }
            Modal::QuitConfirm => {
                self.quit_dialog.submission_pending = self.session.in_flight();
                self.quit_dialog.draw(frame, area)?;
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else {
            self.form.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.collect_outcome(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                if self.runner.is_running() {
                    info!("quitting with a submission still pending");
                }
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Form
            // ─────────────────────────────────────────────────────────────────
            Action::FocusNext | Action::FocusPrev => {
                self.form.update(action)?;
            }
            Action::PickFile(slot, path) => self.pick_file(slot, &path),
            Action::SetPrompt(prompt) => self.session.set_prompt(prompt),
            Action::Submit => self.submit(),

            // ─────────────────────────────────────────────────────────────────
            // Scrolling
            // ─────────────────────────────────────────────────────────────────
            Action::PageUp | Action::PageDown => {
                self.results_panel.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                if !self.modals.contains(&Modal::QuitConfirm) {
                    self.modals.push(Modal::QuitConfirm);
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::DismissAlert => {
                self.session.dismiss_alert();
                self.modals.remove(&Modal::Alert);
            }
        }

        self.sync_view();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = HomeRenderContext {
            session: &self.session,
            view: &self.view,
            workflow_state: self.workflow.state(),
            elapsed: self.runner.elapsed(),
            api_base_url: &self.config.api_base_url,
        };

        draw_home_screen(
            frame,
            area,
            &mut self.form,
            &mut self.log_panel,
            &mut self.results_panel,
            &ctx,
        )?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmitError;
    use crate::model::{ImageAsset, ProcessingResult};
    use crate::render::PaneKind;
    use crate::workflow::{ProcessRequest, WorkflowState};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    struct Canned(Result<ProcessingResult, SubmitError>);

    #[async_trait]
    impl ProcessingService for Canned {
        async fn process(&self, _request: &ProcessRequest) -> Result<ProcessingResult, SubmitError> {
            self.0.clone()
        }
    }

    /// Holds every call open until released
    struct Gated {
        release: Mutex<mpsc::Receiver<()>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProcessingService for Gated {
        async fn process(&self, _request: &ProcessRequest) -> Result<ProcessingResult, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.release.lock().unwrap().recv();
            Ok(ProcessingResult::default())
        }
    }

    fn app_with(outcome: Result<ProcessingResult, SubmitError>) -> App {
        App::new(Config::default(), Arc::new(Canned(outcome)))
    }

    fn select_both(app: &mut App) {
        app.session
            .select_image(
                AssetSlot::Character,
                ImageAsset::new("hero.png", "image/png", vec![1, 2, 3]),
            )
            .unwrap();
        app.session
            .select_image(
                AssetSlot::Reference,
                ImageAsset::new("scene.jpg", "image/jpeg", vec![4, 5]),
            )
            .unwrap();
        app.update(Action::Tick).unwrap();
    }

    fn tick_until_settled(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.session.in_flight() {
            assert!(Instant::now() < deadline, "submission never settled");
            thread::sleep(Duration::from_millis(10));
            app.update(Action::Tick).unwrap();
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                app.draw(f, area).unwrap()
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_submission_round_trip() {
        let result: ProcessingResult = serde_json::from_str(
            r#"{"status":"success","generated_image_path":"/out/final.png",
                "validation_results":{"pose":{"success":true,"score":0.9,"feedback":"ok"}}}"#,
        )
        .unwrap();
        let mut app = app_with(Ok(result));
        select_both(&mut app);

        app.update(Action::Submit).unwrap();
        assert!(app.session.in_flight());
        assert_eq!(app.workflow.state(), WorkflowState::Submitting);

        tick_until_settled(&mut app);

        assert_eq!(app.workflow.state(), WorkflowState::Succeeded);
        assert!(app.modals.is_empty());
        assert!(app.view.pane(PaneKind::OriginalReference).is_some());
        assert!(app.view.pane(PaneKind::FinalFusedImage).is_some());
        assert!(app.view.pane(PaneKind::AdaptedReference).is_none());
        assert_eq!(app.view.validation.as_ref().map(|v| v.len()), Some(1));

        let text = screen(&mut app);
        assert!(text.contains("http://localhost:8000/out/final.png"));
        assert!(text.contains("processing complete"));
    }

    #[test]
    fn test_failed_submission_raises_alert() {
        let mut app = app_with(Err(SubmitError::Status {
            status: 500,
            message: Some("model crashed".to_string()),
        }));
        select_both(&mut app);

        app.update(Action::Submit).unwrap();
        tick_until_settled(&mut app);

        assert_eq!(app.workflow.state(), WorkflowState::Failed);
        assert_eq!(app.modals.top(), Some(&Modal::Alert));
        assert!(app.view.is_empty());

        let text = screen(&mut app);
        assert!(text.contains("Processing failed: model crashed"));

        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::DismissAlert));
        app.update(Action::DismissAlert).unwrap();
        assert!(app.modals.is_empty());
        assert!(app.session.alert().is_none());
    }

    #[test]
    fn test_submit_without_images_shows_warning() {
        let mut app = app_with(Ok(ProcessingResult::default()));
        app.update(Action::Submit).unwrap();

        assert!(!app.runner.is_running());
        assert_eq!(app.modals.top(), Some(&Modal::Alert));
        assert!(app.session.log().is_empty());
    }

    #[test]
    fn test_alert_blocks_form_input() {
        let mut app = app_with(Ok(ProcessingResult::default()));
        app.update(Action::Submit).unwrap();

        let action = app.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(action, None);
        assert!(app.form.character_input.is_empty());
    }

    #[test]
    fn test_rejected_file_keeps_slot_empty() {
        let mut app = app_with(Ok(ProcessingResult::default()));
        app.update(Action::PickFile(
            AssetSlot::Character,
            "/definitely/missing/notes.txt".to_string(),
        ))
        .unwrap();

        assert!(app.session.asset(AssetSlot::Character).is_none());
        assert_eq!(app.modals.top(), Some(&Modal::Alert));
    }

    #[test]
    fn test_quit_flow() {
        let mut app = app_with(Ok(ProcessingResult::default()));
        let action = app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::OpenQuitDialog));
        app.update(Action::OpenQuitDialog).unwrap();

        let text = screen(&mut app);
        assert!(text.contains("Are you sure you want to quit?"));

        let action = app.handle_key_event(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_prompt_reaches_session() {
        let mut app = app_with(Ok(ProcessingResult::default()));
        app.update(Action::SetPrompt("at dusk".to_string())).unwrap();
        assert_eq!(app.session.prompt(), "at dusk");
    }

    #[test]
    fn test_submit_button_disabled_exactly_while_in_flight() {
        let (release, gate) = mpsc::channel();
        let service = Arc::new(Gated {
            release: Mutex::new(gate),
            calls: AtomicUsize::new(0),
        });
        let mut app = App::new(Config::default(), service.clone());
        select_both(&mut app);

        let idle = screen(&mut app);
        assert!(idle.contains("[ Generate fused image ]"));
        assert!(!idle.contains("[ Processing..."));

        app.update(Action::Submit).unwrap();
        assert!(app.session.in_flight());

        let busy = screen(&mut app);
        assert!(busy.contains("[ Processing..."));
        assert!(!busy.contains("[ Generate fused image ]"));

        let log_len = app.session.log().len();
        app.update(Action::Submit).unwrap();
        app.update(Action::Tick).unwrap();
        assert!(app.runner.is_running());
        assert!(app.session.in_flight());
        assert_eq!(app.session.log().len(), log_len);
        assert_eq!(app.workflow.state(), WorkflowState::Submitting);

        release.send(()).unwrap();
        tick_until_settled(&mut app);

        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.workflow.state(), WorkflowState::Succeeded);

        let settled = screen(&mut app);
        assert!(settled.contains("[ Generate fused image ]"));
        assert!(!settled.contains("[ Processing..."));
    }
}
