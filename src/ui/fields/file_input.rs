//! File upload field: type a path, press Enter to pick the file

use super::field_renderer::{draw_field, FieldView, FIELD_HEIGHT};
use super::{edit_text, Component};
use crate::form::{use_form, FileInspector, FileUpload, FormError, FsInspector};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use serde_json::Value;
use std::path::Path;

/// File picker bound to a field holding a [`FileUpload`] or `null`.
///
/// The typed path is kept locally until Enter; then the file is inspected and
/// either stored in the form or reported as the field's error.
pub struct FormFileInput {
    pub name: String,
    pub label: String,
    /// Content types hinted in the placeholder
    pub accept: Vec<String>,
    draft: String,
    inspector: Box<dyn FileInspector>,
}

impl FormFileInput {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_inspector(name, label, FsInspector)
    }

    pub fn with_inspector(
        name: impl Into<String>,
        label: impl Into<String>,
        inspector: impl FileInspector + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            accept: Vec::new(),
            draft: String::new(),
            inspector: Box::new(inspector),
        }
    }

    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.accept.push(content_type.into());
        self
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    fn placeholder(&self) -> String {
        if self.accept.is_empty() {
            "Type a file path, Enter to select".to_string()
        } else {
            format!("Type a file path ({}), Enter to select", self.accept.join(", "))
        }
    }

    /// Inspect the drafted path and store the result in the form
    fn commit(&self) -> Result<(), FormError> {
        let form = use_form("FormFileInput")?;
        let mut form = form.borrow_mut();
        let draft = self.draft.trim();
        if draft.is_empty() {
            form.clear_errors(&self.name);
            form.set_value(&self.name, Value::Null)?;
            return Ok(());
        }
        match self.inspector.inspect(Path::new(draft)) {
            Ok(upload) => {
                tracing::debug!("Selected file {} ({} bytes)", upload.name, upload.size);
                form.clear_errors(&self.name);
                form.set_value(&self.name, serde_json::to_value(&upload)?)?;
            }
            Err(err) => {
                tracing::warn!("Cannot read file {draft}: {err}");
                form.set_value(&self.name, Value::Null)?;
                form.set_error(&self.name, format!("Cannot read file: {err}"));
            }
        }
        Ok(())
    }
}

fn describe(upload: &FileUpload) -> String {
    format!("{} ({} bytes, {})", upload.name, upload.size, upload.mime)
}

impl Component for FormFileInput {
    fn height(&self) -> Result<u16, FormError> {
        Ok(FIELD_HEIGHT)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let form = use_form("FormFileInput")?;
        let state = form.borrow().field_state(&self.name)?;
        let is_active = focus.is_some();
        let selected: Option<FileUpload> = serde_json::from_value(state.value.clone()).ok();

        // While typing show the draft; otherwise the picked file
        let shown = match (&selected, is_active || !self.draft.is_empty()) {
            (Some(upload), false) => describe(upload),
            (Some(upload), true) if self.draft.is_empty() => describe(upload),
            _ => self.draft.clone(),
        };
        draw_field(
            frame,
            area,
            &FieldView {
                label: &self.label,
                value: &shown,
                placeholder: &self.placeholder(),
                error: state.error.as_deref(),
                is_active,
                is_multiline: false,
                show_cursor: true,
            },
        );
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, _focus: usize) -> Result<bool, FormError> {
        match key.code {
            KeyCode::Enter => {
                self.commit()?;
                Ok(true)
            }
            KeyCode::Delete => {
                self.draft.clear();
                self.commit()?;
                Ok(true)
            }
            _ => match edit_text(&key, &self.draft, false) {
                Some(text) => {
                    self.draft = text;
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    fn paste(&mut self, text: &str, _focus: usize) -> Result<bool, FormError> {
        self.draft.push_str(text.trim());
        Ok(true)
    }

    fn focused_field(&self, _focus: usize) -> Result<Option<String>, FormError> {
        Ok(Some(self.name.clone()))
    }
}
