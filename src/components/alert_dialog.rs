//! Alert dialog component
//!
//! Blocking notification for rejected input and failed submissions.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{Alert, AlertLevel};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const DIALOG_WIDTH: u16 = 60;

#[derive(Debug, Default)]
pub struct AlertDialog;

impl AlertDialog {
    pub fn draw_with_alert(&mut self, frame: &mut Frame, area: Rect, alert: &Alert) -> Result<()> {
        let (title, color) = match alert.level {
            AlertLevel::Warning => (" Warning ", Color::Yellow),
            AlertLevel::Error => (" Error ", Color::Red),
        };

        let text_width = DIALOG_WIDTH.saturating_sub(4).max(1) as usize;
        let message_rows = alert
            .message
            .lines()
            .map(|line| line.width().max(1).div_ceil(text_width))
            .sum::<usize>()
            .max(1)
            .min(area.height as usize) as u16;
        let popup_area = centered_popup(area, DIALOG_WIDTH, message_rows.saturating_add(6));

        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        content.extend(alert.message.lines().map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
        }));
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " Enter/Esc ",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("OK"),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title)
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for AlertDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::DismissAlert),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs the alert, so we use draw_with_alert
        Ok(())
    }
}
