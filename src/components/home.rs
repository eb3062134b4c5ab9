//! Home screen
//!
//! The single screen of the application: form and log on the left, results on
//! the right, status and help bars at the bottom.

use crate::components::{calculate_main_layout, FormComponent, LogPanel, ResultsPanel};
use crate::model::SessionState;
use crate::render::ResultView;
use crate::workflow::{WorkflowState, REQUEST_TIMEOUT};
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub session: &'a SessionState,
    pub view: &'a ResultView,
    pub workflow_state: WorkflowState,
    /// Time since the pending submission started, if one is running
    pub elapsed: Option<Duration>,
    pub api_base_url: &'a str,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    form: &mut FormComponent,
    log_panel: &mut LogPanel,
    results: &mut ResultsPanel,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    let busy = if ctx.session.in_flight() {
        Some(ctx.elapsed.unwrap_or_default())
    } else {
        None
    };

    form.draw_with_session(frame, layout.form, ctx.session, busy)?;
    log_panel.draw_with_log(frame, layout.log, ctx.session.log())?;
    results.draw_with_view(frame, layout.results, ctx.view)?;

    render_status_bar(frame, layout.status, ctx, busy);
    render_help_bar(frame, layout.help);

    Ok(())
}

fn state_color(state: WorkflowState) -> Color {
    match state {
        WorkflowState::Idle => Color::DarkGray,
        WorkflowState::Validating | WorkflowState::Submitting => Color::Yellow,
        WorkflowState::Succeeded => Color::Green,
        WorkflowState::Failed => Color::Red,
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext, busy: Option<Duration>) {
    let mut spans = vec![
        Span::styled(
            " fusion-tui ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", ctx.api_base_url),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            ctx.workflow_state.label(),
            Style::default()
                .fg(state_color(ctx.workflow_state))
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(elapsed) = busy {
        spans.push(Span::styled(
            format!(
                " {}s / {}s",
                elapsed.as_secs(),
                REQUEST_TIMEOUT.as_secs()
            ),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled(
            " Tab ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Next field "),
        Span::styled(
            " Enter ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Load path "),
        Span::styled(
            " Ctrl+s ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Submit "),
        Span::styled(
            " PgUp/PgDn ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Scroll results "),
        Span::styled(
            " F1 ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Help "),
        Span::styled(
            " Esc ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Quit"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}
