//! Dropdown-style select bound to a form field

use super::field_renderer::{split_field_area, draw_message};
use super::{is_activate_key, Component};
use crate::form::{use_form, FormError};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::Value;

/// One choice of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Select cycling through fixed options with Left/Right (Space/Enter step
/// forward). Stores the option's `value` string.
#[derive(Debug, Clone)]
pub struct FormSelect {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

impl FormSelect {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: placeholder.into(),
            options,
        }
    }

    fn selected_index(&self, value: &Value) -> Option<usize> {
        let value = value.as_str()?;
        self.options.iter().position(|o| o.value == value)
    }

    /// Option index after stepping `forward` from the current selection.
    /// Nothing selected yet starts at the first (or last) option.
    fn step(&self, current: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        Some(match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(0), false) => len - 1,
            (Some(i), false) => i - 1,
        })
    }
}

impl Component for FormSelect {
    fn height(&self) -> Result<u16, FormError> {
        Ok(super::FIELD_HEIGHT)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let form = use_form("FormSelect")?;
        let state = form.borrow().field_state(&self.name)?;
        let is_active = focus.is_some();
        let (box_area, message_area) = split_field_area(area);

        let arrow_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let choice = match self.selected_index(&state.value) {
            Some(index) => Span::styled(
                self.options[index].label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(self.placeholder.clone(), Style::default().fg(Color::DarkGray)),
        };
        let position = match self.selected_index(&state.value) {
            Some(index) => format!("  {}/{}", index + 1, self.options.len()),
            None => String::new(),
        };
        let line = Line::from(vec![
            Span::styled("◂ ", arrow_style),
            choice,
            Span::styled(" ▸", arrow_style),
            Span::styled(position, Style::default().fg(Color::DarkGray)),
        ]);

        let border_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else if state.error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .borders(Borders::ALL)
            .border_style(border_style);

        frame.render_widget(Paragraph::new(line).block(block), box_area);
        draw_message(frame, message_area, state.error.as_deref());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: usize) -> Result<bool, FormError> {
        let forward = match key.code {
            KeyCode::Right | KeyCode::Char('l') => true,
            KeyCode::Left | KeyCode::Char('h') => false,
            _ if is_activate_key(&key) => true,
            _ => return Ok(false),
        };
        let form = use_form("FormSelect")?;
        let current = self.selected_index(&form.borrow().value(&self.name)?);
        if let Some(next) = self.step(current, forward) {
            let value = Value::String(self.options[next].value.clone());
            form.borrow_mut().set_value(&self.name, value)?;
        }
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
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn select() -> FormSelect {
        FormSelect::new(
            "select",
            "Select Options",
            "Options",
            vec![
                SelectOption::new("Option 1", "1"),
                SelectOption::new("Option 2", "2"),
                SelectOption::new("Option 3", "3"),
            ],
        )
    }

    #[test]
    fn test_right_selects_first_then_cycles() {
        let handle = handle_with(json!({"select": ""}));
        let mut field = select();
        with_form(&handle, || {
            field.handle_key(key(KeyCode::Right), 0).unwrap();
            assert_eq!(handle.borrow().value("select").unwrap(), json!("1"));
            field.handle_key(key(KeyCode::Right), 0).unwrap();
            field.handle_key(key(KeyCode::Right), 0).unwrap();
            field.handle_key(key(KeyCode::Right), 0).unwrap();
        });
        assert_eq!(handle.borrow().value("select").unwrap(), json!("1"));
    }

    #[test]
    fn test_left_wraps_to_last() {
        let handle = handle_with(json!({"select": "1"}));
        let mut field = select();
        with_form(&handle, || {
            field.handle_key(key(KeyCode::Left), 0).unwrap();
        });
        assert_eq!(handle.borrow().value("select").unwrap(), json!("3"));
    }

    #[test]
    fn test_unrelated_key_is_not_consumed() {
        let handle = handle_with(json!({"select": ""}));
        let mut field = select();
        with_form(&handle, || {
            assert!(!field.handle_key(key(KeyCode::Char('x')), 0).unwrap());
        });
        assert_eq!(handle.borrow().value("select").unwrap(), json!(""));
    }

    #[test]
    fn test_draw_placeholder_and_choice() {
        let handle = handle_with(json!({"select": ""}));
        let field = select();
        let screen = render_with(&handle, 40, 4, |frame| {
            let area = frame.area();
            field.draw(frame, area, None).unwrap();
        });
        assert!(screen.contains("Options"));

        handle.borrow_mut().set_value("select", json!("2")).unwrap();
        let screen = render_with(&handle, 40, 4, |frame| {
            let area = frame.area();
            field.draw(frame, area, Some(0)).unwrap();
        });
        assert!(screen.contains("Option 2"));
        assert!(screen.contains("2/3"));
    }

    #[test]
    fn test_empty_options_consume_but_keep_value() {
        let handle = handle_with(json!({"select": ""}));
        let mut field = FormSelect::new("select", "Select", "None", vec![]);
        with_form(&handle, || {
            assert!(field.handle_key(key(KeyCode::Right), 0).unwrap());
        });
        assert_eq!(handle.borrow().value("select").unwrap(), json!(""));
    }
}
