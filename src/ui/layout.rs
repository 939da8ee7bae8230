//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::{PASTE_SHORTCUT, SUBMIT_SHORTCUT};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Keyboard hints for the form
fn form_hints() -> String {
    format!(
        "Tab/↑↓:move  ←→/Space:choose  {SUBMIT_SHORTCUT}:submit  {PASTE_SHORTCUT}:paste  ^R:reset"
    )
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    if app.config.show_help_or_default() {
        spans.push(Span::styled(form_hints(), Style::default().fg(Color::Gray)));
    }

    if let Some(msg) = &app.status_message {
        if spans.len() > 1 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    if let Some(at) = app.form.state().borrow().last_submitted_at() {
        if spans.len() > 1 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(
            format!("Last submitted {}", at.with_timezone(&Local).format("%H:%M:%S")),
            Style::default().fg(Color::Blue),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let width = quit_hint.len() as u16;
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        width: width.min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
