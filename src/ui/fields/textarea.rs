//! Multi-line text area bound to a form field

use super::field_renderer::{draw_field, FieldView};
use super::{edit_text, Component};
use crate::form::{use_form, FormError};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde_json::Value;

/// Visible text rows when not configured
pub const DEFAULT_TEXTAREA_ROWS: u16 = 4;

/// Upper bound for configured rows
pub const MAX_TEXTAREA_ROWS: u16 = 40;

/// Labelled text area; Enter inserts a line break.
/// Must be drawn inside a `CustomForm`.
#[derive(Debug, Clone)]
pub struct FormTextArea {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub rows: u16,
}

impl FormTextArea {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: placeholder.into(),
            rows: DEFAULT_TEXTAREA_ROWS,
        }
    }

    pub fn rows(mut self, rows: u16) -> Self {
        self.rows = rows.clamp(1, MAX_TEXTAREA_ROWS);
        self
    }

    fn current(&self) -> Result<String, FormError> {
        let form = use_form("FormTextArea")?;
        let state = form.borrow().field_state(&self.name)?;
        Ok(state.as_text().to_string())
    }

    fn write(&self, text: String) -> Result<(), FormError> {
        let form = use_form("FormTextArea")?;
        let mut form = form.borrow_mut();
        form.set_value(&self.name, Value::String(text))
    }
}

impl Component for FormTextArea {
    fn height(&self) -> Result<u16, FormError> {
        // borders + text rows + message row
        Ok(self.rows.saturating_add(3))
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let form = use_form("FormTextArea")?;
        let state = form.borrow().field_state(&self.name)?;
        draw_field(
            frame,
            area,
            &FieldView {
                label: &self.label,
                value: state.as_text(),
                placeholder: &self.placeholder,
                error: state.error.as_deref(),
                is_active: focus.is_some(),
                is_multiline: true,
                show_cursor: true,
            },
        );
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: usize) -> Result<bool, FormError> {
        let current = self.current()?;
        match edit_text(&key, &current, true) {
            Some(text) => {
                self.write(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn paste(&mut self, text: &str, _focus: usize) -> Result<bool, FormError> {
        let mut value = self.current()?;
        value.push_str(&text.replace("\r\n", "\n"));
        self.write(value)?;
        Ok(true)
    }

    fn focused_field(&self, _focus: usize) -> Result<Option<String>, FormError> {
        Ok(Some(self.name.clone()))
    }
}
