//! Input form component
//!
//! Two image path fields, the optional prompt, and the submit button. The
//! form owns only its edit buffers and focus; picked files and the prompt
//! live in the session.

use crate::action::Action;
use crate::component::Component;
use crate::model::{AssetSlot, SessionState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

const PROMPT_PLACEHOLDER: &str = "Describe the scene and the effect you want...";

/// Focusable fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    CharacterPath,
    ReferencePath,
    Prompt,
    Submit,
}

impl FormField {
    fn next(&self) -> FormField {
        match self {
            FormField::CharacterPath => FormField::ReferencePath,
            FormField::ReferencePath => FormField::Prompt,
            FormField::Prompt => FormField::Submit,
            FormField::Submit => FormField::CharacterPath,
        }
    }

    fn prev(&self) -> FormField {
        match self {
            FormField::CharacterPath => FormField::Submit,
            FormField::ReferencePath => FormField::CharacterPath,
            FormField::Prompt => FormField::ReferencePath,
            FormField::Submit => FormField::Prompt,
        }
    }

    fn slot(&self) -> Option<AssetSlot> {
        match self {
            FormField::CharacterPath => Some(AssetSlot::Character),
            FormField::ReferencePath => Some(AssetSlot::Reference),
            FormField::Prompt | FormField::Submit => None,
        }
    }
}

/// Upload form
#[derive(Debug, Default)]
pub struct FormComponent {
    pub focus: FormField,
    pub character_input: String,
    pub reference_input: String,
    pub prompt_input: String,
}

impl FormComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn path_input_mut(&mut self, slot: AssetSlot) -> &mut String {
        match slot {
            AssetSlot::Character => &mut self.character_input,
            AssetSlot::Reference => &mut self.reference_input,
        }
    }

    fn path_input(&self, slot: AssetSlot) -> &str {
        match slot {
            AssetSlot::Character => &self.character_input,
            AssetSlot::Reference => &self.reference_input,
        }
    }

    fn handle_path_key(&mut self, slot: AssetSlot, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                let path = self.path_input(slot).trim().to_string();
                (!path.is_empty()).then_some(Action::PickFile(slot, path))
            }
            KeyCode::Backspace => {
                self.path_input_mut(slot).pop();
                None
            }
            KeyCode::Char(c) => {
                self.path_input_mut(slot).push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => self.prompt_input.push('\n'),
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(c) => self.prompt_input.push(c),
            _ => return None,
        }
        Some(Action::SetPrompt(self.prompt_input.clone()))
    }

    /// Draw the form against the current session.
    ///
    /// `busy` carries the elapsed time while a submission is in flight; the
    /// submit button is drawn disabled for exactly that period.
    pub fn draw_with_session(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        session: &SessionState,
        busy: Option<Duration>,
    ) -> Result<()> {
        let mut lines = Vec::new();

        for slot in AssetSlot::all() {
            let field = match slot {
                AssetSlot::Character => FormField::CharacterPath,
                AssetSlot::Reference => FormField::ReferencePath,
            };
            lines.extend(self.path_field_lines(slot, field, session));
            lines.push(Line::from(""));
        }

        lines.extend(self.prompt_lines());
        lines.push(Line::from(""));
        lines.push(self.submit_line(busy, session.has_both_assets()));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Inputs ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
        Ok(())
    }

    fn label_style(&self, field: FormField) -> Style {
        if self.focus == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    }

    fn path_field_lines(
        &self,
        slot: AssetSlot,
        field: FormField,
        session: &SessionState,
    ) -> Vec<Line<'static>> {
        let focused = self.focus == field;
        let cursor = if focused { "_" } else { "" };

        let mut lines = vec![
            Line::from(Span::styled(slot.label(), self.label_style(field))),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}{}", self.path_input(slot), cursor),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        let selected = match session.asset(slot) {
            Some(asset) => Span::styled(
                format!(
                    "✓ {} · {} · {}",
                    asset.file_name,
                    asset.mime_type,
                    asset.size_label()
                ),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("no image selected", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![Span::raw("  "), selected]));

        lines
    }

    fn prompt_lines(&self) -> Vec<Line<'static>> {
        let focused = self.focus == FormField::Prompt;
        let mut lines = vec![Line::from(Span::styled(
            "Prompt (optional)",
            self.label_style(FormField::Prompt),
        ))];

        if self.prompt_input.is_empty() && !focused {
            lines.push(Line::from(Span::styled(
                format!("  {}", PROMPT_PLACEHOLDER),
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let text = if focused {
            format!("{}_", self.prompt_input)
        } else {
            self.prompt_input.clone()
        };
        for line in text.split('\n') {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(Color::White),
            )));
        }
        lines
    }

    /// Drawn disabled while in flight. Without both images it stays pressable
    /// and carries a hint.
    fn submit_line(&self, busy: Option<Duration>, ready: bool) -> Line<'static> {
        let focused = self.focus == FormField::Submit;

        let (label, mut style) = match busy {
            Some(elapsed) => (
                format!("[ Processing... {}s ]", elapsed.as_secs()),
                Style::default().fg(Color::DarkGray),
            ),
            None if ready => (
                "[ Generate fused image ]".to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            None => (
                "[ Generate fused image ]".to_string(),
                Style::default().fg(Color::White),
            ),
        };

        if focused {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let mut spans = vec![Span::styled(label, style)];
        if busy.is_none() && !ready {
            spans.push(Span::styled(
                "  select both images first",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

impl Component for FormComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        let action = match key.code {
            KeyCode::Char('s') if ctrl => Some(Action::Submit),
            KeyCode::Char('c') if ctrl => Some(Action::OpenQuitDialog),
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::F(1) => Some(Action::OpenHelp),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            _ if ctrl => None,
            _ => match self.focus {
                FormField::CharacterPath | FormField::ReferencePath => {
                    let slot = self.focus.slot();
                    slot.and_then(|slot| self.handle_path_key(slot, key))
                }
                FormField::Prompt => self.handle_prompt_key(key),
                FormField::Submit => match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Submit),
                    KeyCode::Char('?') => Some(Action::OpenHelp),
                    KeyCode::Char('q') => Some(Action::OpenQuitDialog),
                    _ => None,
                },
            },
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs session data, so we use draw_with_session
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut FormComponent, text: &str) -> Option<Action> {
        let mut last = None;
        for c in text.chars() {
            last = form.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        last
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut form = FormComponent::new();
        let order = [
            FormField::ReferencePath,
            FormField::Prompt,
            FormField::Submit,
            FormField::CharacterPath,
        ];
        for expected in order {
            let action = form.handle_key_event(key(KeyCode::Tab)).unwrap();
            assert_eq!(action, Some(Action::FocusNext));
            form.update(Action::FocusNext).unwrap();
            assert_eq!(form.focus, expected);
        }
        form.update(Action::FocusPrev).unwrap();
        assert_eq!(form.focus, FormField::Submit);
    }

    #[test]
    fn test_enter_in_path_field_picks_file() {
        let mut form = FormComponent::new();
        type_text(&mut form, " /tmp/hero.png ");
        let action = form.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::PickFile(AssetSlot::Character, "/tmp/hero.png".to_string()))
        );
    }

    #[test]
    fn test_enter_on_empty_path_does_nothing() {
        let mut form = FormComponent::new();
        form.update(Action::FocusNext).unwrap();
        assert_eq!(form.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
    }

    #[test]
    fn test_prompt_edits_emit_full_text() {
        let mut form = FormComponent::new();
        form.focus = FormField::Prompt;
        type_text(&mut form, "sunset");
        let action = form.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SetPrompt("sunset\n".to_string())));
        let action = type_text(&mut form, "beach");
        assert_eq!(action, Some(Action::SetPrompt("sunset\nbeach".to_string())));
        let action = form.handle_key_event(key(KeyCode::Backspace)).unwrap();
        assert_eq!(action, Some(Action::SetPrompt("sunset\nbeac".to_string())));
    }

    #[test]
    fn test_ctrl_s_submits_from_any_field() {
        let mut form = FormComponent::new();
        form.focus = FormField::Prompt;
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key_event(ctrl_s).unwrap(), Some(Action::Submit));
        assert!(form.prompt_input.is_empty());
    }

    #[test]
    fn test_letters_type_into_text_fields_but_not_button() {
        let mut form = FormComponent::new();
        form.focus = FormField::Prompt;
        form.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(form.prompt_input, "q");

        form.focus = FormField::Submit;
        assert_eq!(
            form.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::OpenQuitDialog)
        );
        assert_eq!(
            form.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Submit)
        );
    }

    #[test]
    fn test_submit_line_reflects_readiness() {
        let form = FormComponent::new();
        let text = |line: Line| line.spans.iter().map(|s| s.content.to_string()).collect::<String>();

        assert!(text(form.submit_line(None, false)).contains("select both images first"));
        assert_eq!(text(form.submit_line(None, true)), "[ Generate fused image ]");
        assert_eq!(
            text(form.submit_line(Some(Duration::from_secs(12)), true)),
            "[ Processing... 12s ]"
        );
    }
}
