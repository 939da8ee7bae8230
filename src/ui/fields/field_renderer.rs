//! Shared rendering for labelled, bordered field boxes

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Bordered box plus one row for the validation message
pub const FIELD_HEIGHT: u16 = 4;

const CURSOR: &str = "▌";

/// What a field box shows
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub error: Option<&'a str>,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Show a text cursor when active
    pub show_cursor: bool,
}

fn border_style(is_active: bool, has_error: bool) -> Style {
    match (is_active, has_error) {
        (true, _) => Style::default().fg(Color::Cyan),
        (false, true) => Style::default().fg(Color::Red),
        (false, false) => Style::default().fg(Color::DarkGray),
    }
}

/// Split a field area into the box and the message row
pub fn split_field_area(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Draw a form field box with its label as title and its message below
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let (box_area, message_area) = split_field_area(area);

    let value_style = if view.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if view.is_active && view.show_cursor {
        CURSOR
    } else {
        ""
    };

    let content = if view.value.is_empty() {
        let shown = if view.placeholder.is_empty() && !view.is_active {
            "(empty)"
        } else {
            view.placeholder
        };
        Paragraph::new(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::styled(shown, Style::default().fg(Color::DarkGray)),
        ]))
    } else if view.is_multiline {
        let mut lines: Vec<Line> = view
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), value_style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(view.value, value_style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let block = Block::default()
        .title(format!(" {} ", view.label))
        .borders(Borders::ALL)
        .border_style(border_style(view.is_active, view.error.is_some()));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), box_area);
    draw_message(frame, message_area, view.error);
}

/// Draw the validation message row (blank when valid)
pub fn draw_message(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(message) = error {
        let line = Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}
