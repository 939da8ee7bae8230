//! Single-line text input bound to a form field

use super::field_renderer::{draw_field, FieldView, FIELD_HEIGHT};
use super::{edit_text, Component};
use crate::form::{use_form, FormError};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde_json::Value;

/// Labelled text input with its validation message.
/// Must be drawn inside a `CustomForm`.
#[derive(Debug, Clone)]
pub struct FormInput {
    pub name: String,
    pub label: String,
    pub placeholder: String,
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: placeholder.into(),
        }
    }

    fn write(&self, text: String) -> Result<(), FormError> {
        let form = use_form("FormInput")?;
        let mut form = form.borrow_mut();
        form.set_value(&self.name, Value::String(text))
    }
}

impl Component for FormInput {
    fn height(&self) -> Result<u16, FormError> {
        Ok(FIELD_HEIGHT)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let form = use_form("FormInput")?;
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
                is_multiline: false,
                show_cursor: true,
            },
        );
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: usize) -> Result<bool, FormError> {
        let form = use_form("FormInput")?;
        let current = form.borrow().field_state(&self.name)?;
        match edit_text(&key, current.as_text(), false) {
            Some(text) => {
                self.write(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn paste(&mut self, text: &str, _focus: usize) -> Result<bool, FormError> {
        let form = use_form("FormInput")?;
        let mut value = form.borrow().field_state(&self.name)?.as_text().to_string();
        // Single line: drop line breaks from pasted text
        value.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
        self.write(value)?;
        Ok(true)
    }

    fn focused_field(&self, _focus: usize) -> Result<Option<String>, FormError> {
        Ok(Some(self.name.clone()))
    }
}
