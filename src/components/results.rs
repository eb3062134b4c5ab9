//! Results panel
//!
//! Draws a [`ResultView`]: the comparison panes, the service summary and the
//! validation checks.

use crate::action::Action;
use crate::component::Component;
use crate::render::{ImageSource, PaneKind, ResultView};
use anyhow::Result;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PAGE_SIZE: usize = 10;

#[derive(Debug, Default)]
pub struct ResultsPanel {
    pub scroll_offset: usize,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn draw_with_view(&mut self, frame: &mut Frame, area: Rect, view: &ResultView) -> Result<()> {
        let content = build_result_lines(view);
        let total = content.len();
        let visible_height = area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Results ")
                    .border_style(Style::default().fg(Color::Green)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

impl Component for ResultsPanel {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(PAGE_SIZE),
            Action::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(PAGE_SIZE),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs the rendered view, so we use draw_with_view
        Ok(())
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(Span::styled(
        format!(" {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!(" {}", "─".repeat(title.width() + 2)),
        Style::default().fg(Color::DarkGray),
    )));
}

fn detail(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("   {:<6}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn build_result_lines(view: &ResultView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if view.is_empty() {
        lines.push(Line::from(Span::styled(
            " No result yet. Select both images and submit.",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    if !view.panes.is_empty() {
        section(&mut lines, "Result comparison");
        for pane in PaneKind::all().into_iter().filter_map(|kind| view.pane(kind)) {
            lines.push(Line::from(Span::styled(
                format!(" ▣ {}", pane.kind.title()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            match &pane.source {
                ImageSource::Local {
                    mime_type, size, ..
                } => {
                    lines.push(detail("file", pane.source.location().to_string()));
                    lines.push(detail("type", format!("{} ({})", mime_type, size)));
                }
                ImageSource::Remote { url, .. } => {
                    lines.push(detail("path", pane.source.location().to_string()));
                    lines.push(detail("url", url.clone()));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if !view.summary.is_empty() {
        section(&mut lines, "Service response");
        for (label, value) in &view.summary {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<12}", label), Style::default().fg(Color::DarkGray)),
                Span::styled(value.clone(), Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(rows) = &view.validation {
        section(&mut lines, "Validation results");
        if rows.is_empty() {
            lines.push(Line::from(Span::styled(
                " (no checks reported)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let name_width = rows.iter().map(|r| r.name.width()).max().unwrap_or(0);
        for row in rows {
            let (mark, color) = if row.success {
                ("✓", Color::Green)
            } else {
                ("✗", Color::Red)
            };
            let padding = " ".repeat(name_width.saturating_sub(row.name.width()));
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(color)),
                Span::styled(
                    format!("{}{}", row.name, padding),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} ", row.tag()),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!(" score {}", row.score_label()),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
            if !row.feedback.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", row.feedback),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Pane, ValidationRow};

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_view_shows_placeholder() {
        let lines = build_result_lines(&ResultView::default());
        assert!(text(&lines).contains("No result yet"));
    }

    #[test]
    fn test_panes_and_checks_are_listed() {
        let view = ResultView {
            panes: vec![Pane {
                kind: PaneKind::FinalFusedImage,
                source: ImageSource::Remote {
                    path: "/out/final.png".to_string(),
                    url: "http://localhost:8000/out/final.png".to_string(),
                },
            }],
            validation: Some(vec![
                ValidationRow {
                    name: "pose".to_string(),
                    success: true,
                    score: 0.92,
                    feedback: "ok".to_string(),
                },
                ValidationRow {
                    name: "lighting".to_string(),
                    success: false,
                    score: 0.4,
                    feedback: String::new(),
                },
            ]),
            summary: Vec::new(),
        };

        let rendered = text(&build_result_lines(&view));
        assert!(rendered.contains("Final fused image"));
        assert!(rendered.contains("http://localhost:8000/out/final.png"));
        assert!(!rendered.contains("Adapted reference"));
        assert!(rendered.contains("✓ pose      success  score 0.92"));
        assert!(rendered.contains("✗ lighting  failure  score 0.4"));
    }

    #[test]
    fn test_empty_validation_mapping_still_gets_a_section() {
        let view = ResultView {
            validation: Some(Vec::new()),
            ..ResultView::default()
        };
        let rendered = text(&build_result_lines(&view));
        assert!(rendered.contains("Validation results"));
        assert!(rendered.contains("no checks reported"));
    }

    #[test]
    fn test_page_keys_scroll() {
        let mut panel = ResultsPanel::new();
        panel.update(Action::PageDown).unwrap();
        assert_eq!(panel.scroll_offset, PAGE_SIZE);
        panel.update(Action::PageUp).unwrap();
        panel.update(Action::PageUp).unwrap();
        assert_eq!(panel.scroll_offset, 0);
    }
}
