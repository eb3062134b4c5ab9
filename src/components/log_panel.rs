//! Processing log panel
//!
//! Shows the session log oldest first, following the tail.

use crate::component::Component;
use crate::model::log::LogEntry;
use crate::model::LogAccumulator;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Width of the `[HH:MM:SS] ` prefix
const TIMESTAMP_WIDTH: usize = 11;

#[derive(Debug, Default)]
pub struct LogPanel;

impl LogPanel {
    pub fn draw_with_log(&mut self, frame: &mut Frame, area: Rect, log: &LogAccumulator) -> Result<()> {
        let visible_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2).max(1) as usize;

        let lines: Vec<Line> = if log.is_empty() {
            vec![Line::from(Span::styled(
                "No activity yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            let entries = log.entries();
            let skip = entries.len() - tail_len(entries, inner_width, visible_height);
            entries
                .iter()
                .skip(skip)
                .map(|entry| {
                    let color = if entry.is_failure() {
                        Color::Red
                    } else {
                        Color::White
                    };
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", entry.formatted_time()),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(entry.message.clone(), Style::default().fg(color)),
                    ])
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Processing log ({}) ", log.len()))
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
        Ok(())
    }
}

/// Rows an entry occupies once wrapped to `width`
fn wrapped_rows(entry: &LogEntry, width: usize) -> usize {
    let text_width = TIMESTAMP_WIDTH + entry.message.width();
    text_width.max(1).div_ceil(width)
}

/// How many of the newest entries fit in `height` wrapped rows. The newest
/// entry is always kept, even when it alone overflows.
fn tail_len(entries: &[LogEntry], width: usize, height: usize) -> usize {
    let mut used = 0;
    let mut count = 0;
    for entry in entries.iter().rev() {
        used += wrapped_rows(entry, width);
        if used > height && count > 0 {
            break;
        }
        count += 1;
    }
    count
}

impl Component for LogPanel {
    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs session data, so we use draw_with_log
        Ok(())
    }
}
