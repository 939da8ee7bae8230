//! Repeatable group of fields backed by a list in the form values

use super::{is_activate_key, Component};
use crate::form::{path::join_path, use_form, ArrayEntry, FormError};
use crate::ui::components::{button_width, render_button, BUTTON_HEIGHT};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

/// Builds the components of one entry from the entry's path prefix
/// (`array_element.0`, `array_element.1`, ...)
pub type EntryTemplate = Box<dyn Fn(&str) -> Vec<Box<dyn Component>>>;

/// Components built for one entry, valid while the entry keeps `index`
struct CachedEntry {
    index: usize,
    children: Vec<Box<dyn Component>>,
}

/// Where a focus stop lands inside the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Child {
        entry: usize,
        child: usize,
        local: usize,
    },
    Remove {
        entry: usize,
    },
    Append,
}

/// A titled card listing one sub-card per list entry, each with a remove
/// button, followed by an append button that adds `new_entry`.
pub struct FormFieldArray {
    pub name: String,
    pub title: String,
    pub description: String,
    pub append_label: String,
    new_entry: Value,
    template: EntryTemplate,
    /// Entry components keyed by the entry's stable id
    cache: RefCell<HashMap<Uuid, CachedEntry>>,
}

impl FormFieldArray {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        new_entry: Value,
        template: impl Fn(&str) -> Vec<Box<dyn Component>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: String::new(),
            append_label: "Append".to_string(),
            new_entry,
            template: Box::new(template),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn append_label(mut self, label: impl Into<String>) -> Self {
        self.append_label = label.into();
        self
    }

    fn entries(&self) -> Result<Vec<ArrayEntry>, FormError> {
        let form = use_form("FormFieldArray")?;
        let entries = form.borrow_mut().field_entries(&self.name)?;
        self.cache
            .borrow_mut()
            .retain(|id, _| entries.iter().any(|entry| entry.id == *id));
        Ok(entries)
    }

    /// Run `f` on the components of `entry`. They are kept per entry id so
    /// their local state lasts between frames, and rebuilt when the entry
    /// moves to another index.
    fn with_entry<R>(
        &self,
        entry: ArrayEntry,
        f: impl FnOnce(&mut [Box<dyn Component>]) -> R,
    ) -> R {
        let mut cache = self.cache.borrow_mut();
        let cached = cache.entry(entry.id).or_insert_with(|| CachedEntry {
            index: entry.index,
            children: (self.template)(&join_path(&self.name, entry.index)),
        });
        if cached.index != entry.index {
            tracing::debug!("Entry {} of {} moved to {}", entry.id, self.name, entry.index);
            *cached = CachedEntry {
                index: entry.index,
                children: (self.template)(&join_path(&self.name, entry.index)),
            };
        }
        f(&mut cached.children)
    }

    fn with_entry_at<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut [Box<dyn Component>]) -> Result<R, FormError>,
    ) -> Result<R, FormError> {
        let entries = self.entries()?;
        let len = entries.len();
        let entry = entries
            .get(index)
            .copied()
            .ok_or_else(|| FormError::IndexOutOfBounds {
                path: self.name.clone(),
                index,
                len,
            })?;
        self.with_entry(entry, f)
    }

    fn entry_stops(children: &[Box<dyn Component>]) -> Result<usize, FormError> {
        let mut stops = 1; // remove button
        for child in children {
            stops += child.focus_stops()?;
        }
        Ok(stops)
    }

    fn locate(&self, focus: usize) -> Result<Target, FormError> {
        let mut remaining = focus;
        for entry in self.entries()? {
            let found = self.with_entry(entry, |children| -> Result<Option<Target>, FormError> {
                let stops = Self::entry_stops(children)?;
                if remaining >= stops {
                    remaining -= stops;
                    return Ok(None);
                }
                for (child, component) in children.iter().enumerate() {
                    let child_stops = component.focus_stops()?;
                    if remaining < child_stops {
                        return Ok(Some(Target::Child {
                            entry: entry.index,
                            child,
                            local: remaining,
                        }));
                    }
                    remaining -= child_stops;
                }
                Ok(Some(Target::Remove { entry: entry.index }))
            })?;
            if let Some(target) = found {
                return Ok(target);
            }
        }
        Ok(Target::Append)
    }

    fn entry_height(children: &[Box<dyn Component>]) -> Result<u16, FormError> {
        let mut height = 2 + 1; // card borders + remove row
        for child in children {
            height += child.height()?;
        }
        Ok(height)
    }
}

/// Carve `rows` off the top of `area`; None once nothing is left
fn take_rows(area: &mut Rect, rows: u16) -> Option<Rect> {
    if area.height == 0 {
        return None;
    }
    let taken = rows.min(area.height);
    let rect = Rect {
        height: taken,
        ..*area
    };
    area.y += taken;
    area.height -= taken;
    Some(rect)
}

impl Component for FormFieldArray {
    fn height(&self) -> Result<u16, FormError> {
        let mut height = 2 + BUTTON_HEIGHT; // outer borders + append button
        if !self.description.is_empty() {
            height += 1;
        }
        for entry in self.entries()? {
            height += self.with_entry(entry, |children| Self::entry_height(children))?;
        }
        Ok(height)
    }

    fn focus_stops(&self) -> Result<usize, FormError> {
        let mut stops = 1; // append button
        for entry in self.entries()? {
            stops += self.with_entry(entry, |children| Self::entry_stops(children))?;
        }
        Ok(stops)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, focus: Option<usize>) -> Result<(), FormError> {
        let target = focus.map(|f| self.locate(f)).transpose()?;
        let border_color = if focus.is_some() {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let mut inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.description.is_empty() {
            if let Some(row) = take_rows(&mut inner, 1) {
                frame.render_widget(
                    Paragraph::new(self.description.as_str())
                        .style(Style::default().fg(Color::DarkGray)),
                    row,
                );
            }
        }

        for entry in self.entries()? {
            let drawn = self.with_entry(entry, |children| -> Result<bool, FormError> {
                let Some(card_area) = take_rows(&mut inner, Self::entry_height(children)?)
                else {
                    return Ok(false);
                };
                let card = Block::default()
                    .title(format!(" #{} ", entry.index + 1))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray));
                let mut card_inner = card.inner(card_area);
                frame.render_widget(card, card_area);

                for (index, child) in children.iter().enumerate() {
                    let Some(child_area) = take_rows(&mut card_inner, child.height()?) else {
                        break;
                    };
                    let child_focus = match target {
                        Some(Target::Child {
                            entry: e,
                            child: c,
                            local,
                        }) if e == entry.index && c == index => Some(local),
                        _ => None,
                    };
                    child.draw(frame, child_area, child_focus)?;
                }

                if let Some(row) = take_rows(&mut card_inner, 1) {
                    let selected = target == Some(Target::Remove { entry: entry.index });
                    let style = if selected {
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(Color::Red)
                    };
                    let remove = Line::from(Span::styled(" ✕ Remove ", style));
                    frame.render_widget(Paragraph::new(remove), row);
                }
                Ok(true)
            })?;
            if !drawn {
                break;
            }
        }

        if let Some(button_area) = take_rows(&mut inner, BUTTON_HEIGHT) {
            let content = format!("+ {}", self.append_label);
            let width = button_width(&content).min(button_area.width);
            render_button(
                frame,
                Rect {
                    width,
                    ..button_area
                },
                &content,
                target == Some(Target::Append),
                true,
            );
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, focus: usize) -> Result<bool, FormError> {
        match self.locate(focus)? {
            Target::Child {
                entry,
                child,
                local,
            } => self.with_entry_at(entry, |children| children[child].handle_key(key, local)),
            Target::Remove { entry } if is_activate_key(&key) => {
                let form = use_form("FormFieldArray")?;
                form.borrow_mut().remove(&self.name, entry)?;
                Ok(true)
            }
            Target::Append if is_activate_key(&key) => {
                let form = use_form("FormFieldArray")?;
                form.borrow_mut()
                    .append(&self.name, self.new_entry.clone())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn paste(&mut self, text: &str, focus: usize) -> Result<bool, FormError> {
        match self.locate(focus)? {
            Target::Child {
                entry,
                child,
                local,
            } => self.with_entry_at(entry, |children| children[child].paste(text, local)),
            _ => Ok(false),
        }
    }

    fn focused_field(&self, focus: usize) -> Result<Option<String>, FormError> {
        match self.locate(focus)? {
            Target::Child {
                entry,
                child,
                local,
            } => self.with_entry_at(entry, |children| children[child].focused_field(local)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::with_form;
    use crate::ui::fields::test_support::{handle_with, render_with};
    use crate::ui::fields::{FormCheckbox, FormFileInput, FormInput};
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn horses() -> FormFieldArray {
        FormFieldArray::new(
            "array_element",
            "Horses",
            json!({"checkbox": false, "input": ""}),
            |prefix| {
                vec![
                    Box::new(FormInput::new(format!("{prefix}.input"), "Input", "Input"))
                        as Box<dyn Component>,
                    Box::new(FormCheckbox::new(format!("{prefix}.checkbox"), "Checkbox")),
                ]
            },
        )
        .description("Inline")
    }

    fn values(inputs: &[&str]) -> serde_json::Value {
        let entries: Vec<_> = inputs
            .iter()
            .map(|input| json!({"checkbox": false, "input": input}))
            .collect();
        json!({ "array_element": entries })
    }

    fn list_len(handle: &crate::form::FormHandle) -> usize {
        handle
            .borrow()
            .value("array_element")
            .unwrap()
            .as_array()
            .map(Vec::len)
            .unwrap()
    }

    #[test]
    fn test_focus_stops_per_entry() {
        let handle = handle_with(values(&["a", "b"]));
        let group = horses();
        with_form(&handle, || {
            // (input + checkbox + remove) * 2 + append
            assert_eq!(group.focus_stops().unwrap(), 7);
            assert_eq!(group.locate(0).unwrap(), Target::Child { entry: 0, child: 0, local: 0 });
            assert_eq!(group.locate(2).unwrap(), Target::Remove { entry: 0 });
            assert_eq!(group.locate(4).unwrap(), Target::Child { entry: 1, child: 1, local: 0 });
            assert_eq!(group.locate(6).unwrap(), Target::Append);
        });
    }

    #[test]
    fn test_append_adds_default_entry() {
        let handle = handle_with(values(&["a"]));
        let mut group = horses();
        with_form(&handle, || {
            let append = group.focus_stops().unwrap() - 1;
            assert!(group.handle_key(key(KeyCode::Enter), append).unwrap());
        });
        assert_eq!(list_len(&handle), 2);
        assert_eq!(
            handle.borrow().value("array_element.1").unwrap(),
            json!({"checkbox": false, "input": ""})
        );
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let handle = handle_with(values(&["a", "b", "c"]));
        let mut group = horses();
        with_form(&handle, || {
            // remove button of the second entry
            assert_eq!(group.locate(5).unwrap(), Target::Remove { entry: 1 });
            assert!(group.handle_key(key(KeyCode::Enter), 5).unwrap());
        });
        assert_eq!(list_len(&handle), 2);
        assert_eq!(handle.borrow().value("array_element.0.input").unwrap(), json!("a"));
        assert_eq!(handle.borrow().value("array_element.1.input").unwrap(), json!("c"));
    }

    #[test]
    fn test_keys_reach_entry_fields() {
        let handle = handle_with(values(&["", ""]));
        let mut group = horses();
        with_form(&handle, || {
            group.handle_key(key(KeyCode::Char('z')), 3).unwrap();
            group.handle_key(key(KeyCode::Char(' ')), 4).unwrap();
            assert_eq!(
                group.focused_field(3).unwrap().as_deref(),
                Some("array_element.1.input")
            );
            assert!(group.focused_field(2).unwrap().is_none());
        });
        assert_eq!(handle.borrow().value("array_element.1.input").unwrap(), json!("z"));
        assert_eq!(handle.borrow().value("array_element.1.checkbox").unwrap(), json!(true));
        assert_eq!(handle.borrow().value("array_element.0.input").unwrap(), json!(""));
    }

    #[test]
    fn test_non_activate_key_on_buttons_is_ignored() {
        let handle = handle_with(values(&["a"]));
        let mut group = horses();
        with_form(&handle, || {
            assert!(!group.handle_key(key(KeyCode::Char('x')), 2).unwrap());
            assert!(!group.handle_key(key(KeyCode::Char('x')), 3).unwrap());
        });
        assert_eq!(list_len(&handle), 1);
    }

    #[test]
    fn test_height_grows_with_entries() {
        let handle = handle_with(values(&["a"]));
        let group = horses();
        with_form(&handle, || {
            let one = group.height().unwrap();
            handle
                .borrow_mut()
                .append("array_element", json!({"checkbox": false, "input": ""}))
                .unwrap();
            let two = group.height().unwrap();
            // card borders + input + checkbox + remove row
            assert_eq!(two - one, 2 + 4 + 2 + 1);
        });
    }

    #[test]
    fn test_draw_lists_entries() {
        let handle = handle_with(values(&["first", "second"]));
        let group = horses();
        let height = with_form(&handle, || group.height().unwrap());
        let screen = render_with(&handle, 40, height, |frame| {
            let area = frame.area();
            group.draw(frame, area, Some(0)).unwrap();
        });
        assert!(screen.contains("Horses"));
        assert!(screen.contains("Inline"));
        assert!(screen.contains("first"));
        assert!(screen.contains("second"));
        assert!(screen.contains("Append"));
        assert_eq!(screen.matches("Remove").count(), 2);
    }

    fn attachments() -> FormFieldArray {
        FormFieldArray::new("files", "Files", json!(null), |prefix| {
            vec![Box::new(FormFileInput::new(prefix.to_string(), "File"))
                as Box<dyn Component>]
        })
    }

    #[test]
    fn test_entry_components_keep_local_state() {
        let handle = handle_with(json!({"files": [null, null]}));
        let mut group = attachments();
        with_form(&handle, || {
            // file field of the second entry
            for c in "b.xlsx".chars() {
                assert!(group.handle_key(key(KeyCode::Char(c)), 2).unwrap());
            }
        });
        let screen = render_with(&handle, 50, 30, |frame| {
            let area = frame.area();
            group.draw(frame, area, Some(2)).unwrap();
        });
        assert!(screen.contains("b.xlsx"));
    }

    #[test]
    fn test_removed_entries_drop_their_components() {
        let handle = handle_with(json!({"files": [null, null]}));
        let mut group = attachments();
        with_form(&handle, || {
            group.focus_stops().unwrap();
            assert_eq!(group.cache.borrow().len(), 2);
            // remove button of the first entry
            assert!(group.handle_key(key(KeyCode::Enter), 1).unwrap());
            group.focus_stops().unwrap();
        });
        assert_eq!(group.cache.borrow().len(), 1);
        let remaining = handle.borrow_mut().field_entries("files").unwrap();
        assert!(group.cache.borrow().contains_key(&remaining[0].id));
    }

    #[test]
    fn test_outside_form_fails() {
        let group = horses();
        assert!(matches!(
            group.focus_stops(),
            Err(FormError::MissingContext {
                component: "FormFieldArray"
            })
        ));
    }
}
