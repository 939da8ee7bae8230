//! Field components
//!
//! Each component binds one named field of the enclosing form (looked up
//! through the form context) to a terminal control and its validation
//! message:
//! - `input`: single-line text
//! - `textarea`: multi-line text
//! - `select`: choice between fixed options
//! - `checkbox`: boolean toggle
//! - `file_input`: file picked by path
//! - `field_array`: repeatable group of the above

mod checkbox;
mod field_array;
mod field_renderer;
mod file_input;
mod input;
mod select;
mod textarea;

pub use checkbox::FormCheckbox;
pub use field_array::FormFieldArray;
pub use field_renderer::{draw_field, draw_message, FieldView, FIELD_HEIGHT};
pub use file_input::FormFileInput;
pub use input::FormInput;
pub use select::{FormSelect, SelectOption};
pub use textarea::FormTextArea;

use crate::form::FormError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

/// A unit drawn inside a [`CustomForm`](crate::ui::CustomForm).
///
/// Focus is addressed by local stop index: a component with `n` stops is
/// focused at `0..n`. Components without stops are skipped by navigation.
pub trait Component {
    /// Rows the component needs
    fn height(&self) -> Result<u16, FormError>;

    fn focus_stops(&self) -> Result<usize, FormError> {
        Ok(1)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError>;

    /// Returns whether the key was consumed
    fn handle_key(&mut self, key: KeyEvent, focus: usize) -> Result<bool, FormError>;

    /// Insert pasted text at the focused stop
    fn paste(&mut self, _text: &str, _focus: usize) -> Result<bool, FormError> {
        Ok(false)
    }

    /// Dot path of the field behind a focus stop, used for touched tracking
    fn focused_field(&self, _focus: usize) -> Result<Option<String>, FormError> {
        Ok(None)
    }
}

/// Apply a text-editing key to `current`, returning the new text when the
/// key changed it
pub(crate) fn edit_text(key: &KeyEvent, current: &str, multiline: bool) -> Option<String> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(String::new()),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop().map(|_| text)
        }
        KeyCode::Enter if multiline => {
            let mut text = current.to_string();
            text.push('\n');
            Some(text)
        }
        _ => None,
    }
}

/// Keys that confirm or toggle a control
pub(crate) fn is_activate_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::form::{with_form, FormHandle, FormState};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::cell::RefCell;
    use std::rc::Rc;
    use validator::Validate;

    /// Schema-free form for exercising components
    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct AnyValues {
        #[serde(flatten)]
        pub rest: serde_json::Map<String, Value>,
    }

    pub fn handle_with(values: Value) -> FormHandle {
        Rc::new(RefCell::new(FormState::<AnyValues>::from_values(
            values,
            |_| {},
        )))
    }

    /// Render with `f` under the given form and return the screen text
    pub fn render_with(
        handle: &FormHandle,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut ratatui::Frame),
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        with_form(handle, || {
            terminal.draw(f).unwrap();
        });
        buffer_text(terminal.backend().buffer())
    }

    pub fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
