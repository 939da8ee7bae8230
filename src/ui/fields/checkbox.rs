//! Checkbox bound to a boolean form field

use super::field_renderer::draw_message;
use super::{is_activate_key, Component};
use crate::form::{use_form, FormError};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use serde_json::Value;

/// `[x] Label` toggled with Space or Enter
#[derive(Debug, Clone)]
pub struct FormCheckbox {
    pub name: String,
    pub label: String,
}

impl FormCheckbox {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

impl Component for FormCheckbox {
    fn height(&self) -> Result<u16, FormError> {
        // control row + message row
        Ok(2)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let form = use_form("FormCheckbox")?;
        let state = form.borrow().field_state(&self.name)?;
        let is_active = focus.is_some();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let mark = if state.as_bool() { "[x]" } else { "[ ]" };
        let (prefix, style) = if is_active {
            (
                "▸ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default())
        };
        let line = Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(mark, style),
            Span::raw(" "),
            Span::styled(self.label.clone(), style),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[0]);
        draw_message(frame, chunks[1], state.error.as_deref());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: usize) -> Result<bool, FormError> {
        if !is_activate_key(&key) {
            return Ok(false);
        }
        let form = use_form("FormCheckbox")?;
        let checked = form.borrow().field_state(&self.name)?.as_bool();
        form.borrow_mut()
            .set_value(&self.name, Value::Bool(!checked))?;
        Ok(true)
    }

    fn focused_field(&self, _focus: usize) -> Result<Option<String>, FormError> {
        Ok(Some(self.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::with_form;
    use crate::ui::fields::test_support::{handle_with, render_with};
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_space_toggles() {
        let handle = handle_with(json!({"checkbox": false}));
        let mut checkbox = FormCheckbox::new("checkbox", "Checkbox");
        with_form(&handle, || {
            assert!(checkbox.handle_key(key(KeyCode::Char(' ')), 0).unwrap());
        });
        assert_eq!(handle.borrow().value("checkbox").unwrap(), json!(true));
        with_form(&handle, || {
            checkbox.handle_key(key(KeyCode::Enter), 0).unwrap();
        });
        assert_eq!(handle.borrow().value("checkbox").unwrap(), json!(false));
    }

    #[test]
    fn test_missing_value_toggles_to_true() {
        let handle = handle_with(json!({}));
        let mut checkbox = FormCheckbox::new("flags.accept", "Accept");
        with_form(&handle, || {
            checkbox.handle_key(key(KeyCode::Enter), 0).unwrap();
        });
        assert_eq!(handle.borrow().value("flags.accept").unwrap(), json!(true));
    }

    #[test]
    fn test_other_keys_ignored_even_outside_form() {
        let mut checkbox = FormCheckbox::new("checkbox", "Checkbox");
        assert!(!checkbox.handle_key(key(KeyCode::Char('x')), 0).unwrap());
    }

    #[test]
    fn test_draw_shows_state() {
        let handle = handle_with(json!({"checkbox": true}));
        let checkbox = FormCheckbox::new("checkbox", "Checkbox");
        let screen = render_with(&handle, 20, 2, |frame| {
            let area = frame.area();
            checkbox.draw(frame, area, None).unwrap();
        });
        assert!(screen.contains("[x] Checkbox"));
    }

    #[test]
    fn test_draw_outside_form_fails() {
        let checkbox = FormCheckbox::new("checkbox", "Checkbox");
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(20, 2)).unwrap();
        let mut result = Ok(());
        terminal
            .draw(|frame| {
                let area = frame.area();
                result = checkbox.draw(frame, area, None);
            })
            .unwrap();
        assert!(result.is_err());
    }
}
