//! Form container: owns the state, provides it to its fields and handles
//! focus and submission

use super::components::{button_width, render_colored_button, BUTTON_HEIGHT};
use super::fields::{draw_message, is_activate_key, Component};
use crate::form::{
    with_form, FormControl, FormError, FormHandle, FormState, Schema, SubmitOutcome,
    ROOT_ERROR_KEY,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";

/// What a key press did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Ignored,
    Handled,
    Submitted,
    Invalid { error_count: usize },
}

/// Focused child and the stop inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FocusTarget {
    child: usize,
    local: usize,
    /// Global index of the child's first stop
    start: usize,
    stops: usize,
}

/// A form bound to schema `S`.
///
/// Children are laid out top to bottom and can use [`use_form`](crate::form::use_form)
/// while the form draws them or routes input to them. The submit button is
/// the last focus stop.
pub struct CustomForm<S> {
    state: Rc<RefCell<FormState<S>>>,
    children: Vec<Box<dyn Component>>,
    focus: usize,
    title: String,
    description: String,
    submit_label: String,
}

impl<S: Schema + 'static> CustomForm<S> {
    pub fn new<T: Serialize>(
        defaults: &T,
        on_submit: impl FnMut(S) + 'static,
    ) -> Result<Self, FormError> {
        Ok(Self::with_state(FormState::new(defaults, on_submit)?))
    }

    pub fn from_values(defaults: Value, on_submit: impl FnMut(S) + 'static) -> Self {
        Self::with_state(FormState::from_values(defaults, on_submit))
    }

    fn with_state(state: FormState<S>) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            children: Vec::new(),
            focus: 0,
            title: String::new(),
            description: String::new(),
            submit_label: DEFAULT_SUBMIT_LABEL.to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn child(mut self, component: impl Component + 'static) -> Self {
        self.children.push(Box::new(component));
        self
    }

    /// The form as seen by field components
    pub fn handle(&self) -> FormHandle {
        self.state.clone()
    }

    pub fn state(&self) -> &Rc<RefCell<FormState<S>>> {
        &self.state
    }

    /// Global index of the focused stop
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_submit_focused(&self) -> Result<bool, FormError> {
        let handle = self.handle();
        with_form(&handle, || Ok(self.locate()?.is_none()))
    }

    /// Validate and submit, as if the submit button was pressed
    pub fn submit(&mut self) -> Result<FormEvent, FormError> {
        let handle = self.handle();
        with_form(&handle, || self.submit_inner())
    }

    /// Restore defaults and move focus back to the first field
    pub fn reset(&mut self) {
        self.state.borrow_mut().reset();
        self.focus = 0;
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) -> Result<(), FormError> {
        let handle = self.handle();
        with_form(&handle, || self.draw_inner(frame, area))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<FormEvent, FormError> {
        let handle = self.handle();
        with_form(&handle, || self.handle_key_inner(key))
    }

    /// Forward pasted text to the focused field
    pub fn paste(&mut self, text: &str) -> Result<bool, FormError> {
        let handle = self.handle();
        with_form(&handle, || match self.locate()? {
            Some(target) => self.children[target.child].paste(text, target.local),
            None => Ok(false),
        })
    }

    fn total_stops(&self) -> Result<usize, FormError> {
        let mut stops = 1; // submit button
        for child in &self.children {
            stops += child.focus_stops()?;
        }
        Ok(stops)
    }

    /// None when the submit button has focus
    fn locate(&self) -> Result<Option<FocusTarget>, FormError> {
        let mut start = 0;
        for (child, component) in self.children.iter().enumerate() {
            let stops = component.focus_stops()?;
            if self.focus < start + stops {
                return Ok(Some(FocusTarget {
                    child,
                    local: self.focus - start,
                    start,
                    stops,
                }));
            }
            start += stops;
        }
        Ok(None)
    }

    fn focused_field(&self) -> Result<Option<String>, FormError> {
        match self.locate()? {
            Some(target) => self.children[target.child].focused_field(target.local),
            None => Ok(None),
        }
    }

    fn move_focus(&mut self, forward: bool) -> Result<(), FormError> {
        if let Some(name) = self.focused_field()? {
            self.state.borrow_mut().mark_touched(&name);
        }
        let total = self.total_stops()?;
        self.focus = if forward {
            (self.focus + 1) % total
        } else {
            (self.focus + total - 1) % total
        };
        tracing::debug!("Form focus moved to stop {}", self.focus);
        Ok(())
    }

    fn submit_inner(&mut self) -> Result<FormEvent, FormError> {
        match FormState::submit_shared(&self.state) {
            SubmitOutcome::Submitted => Ok(FormEvent::Submitted),
            SubmitOutcome::Invalid { error_count } => {
                self.focus_first_error()?;
                Ok(FormEvent::Invalid { error_count })
            }
        }
    }

    /// Move focus to the first stop whose field has an error
    fn focus_first_error(&mut self) -> Result<(), FormError> {
        let total = self.total_stops()?;
        for stop in 0..total {
            self.focus = stop;
            if let Some(name) = self.focused_field()? {
                if self.state.borrow().errors().contains(&name) {
                    return Ok(());
                }
            }
        }
        self.focus = total - 1;
        Ok(())
    }

    fn handle_key_inner(&mut self, key: KeyEvent) -> Result<FormEvent, FormError> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return self.submit_inner(),
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true)?;
                return Ok(FormEvent::Handled);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false)?;
                return Ok(FormEvent::Handled);
            }
            _ => {}
        }

        let Some(target) = self.locate()? else {
            if is_activate_key(&key) {
                return self.submit_inner();
            }
            return Ok(FormEvent::Ignored);
        };

        if !self.children[target.child].handle_key(key, target.local)? {
            return Ok(FormEvent::Ignored);
        }

        // Keep focus on the trailing stop (an append button) when a
        // component grows or shrinks, and inside the form in any case
        let new_stops = self.children[target.child].focus_stops()?;
        if new_stops > 0
            && (self.focus >= target.start + new_stops
                || (new_stops != target.stops && target.local + 1 == target.stops))
        {
            self.focus = target.start + new_stops - 1;
        }
        self.focus = self.focus.min(self.total_stops()? - 1);
        Ok(FormEvent::Handled)
    }

    fn draw_inner(&self, frame: &mut Frame, area: Rect) -> Result<(), FormError> {
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let mut inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.description.is_empty() && inner.height > 0 {
            frame.render_widget(
                Paragraph::new(self.description.as_str())
                    .style(Style::default().fg(Color::DarkGray)),
                Rect { height: 1, ..inner },
            );
            inner.y += 1;
            inner.height -= 1;
        }

        // Bottom: form-level message row, then the submit button
        let footer = BUTTON_HEIGHT + 1;
        let viewport = Rect {
            height: inner.height.saturating_sub(footer),
            ..inner
        };
        let message_row = Rect {
            y: viewport.y + viewport.height,
            height: 1u16.min(inner.height),
            ..inner
        };
        let button_row = Rect {
            y: message_row.y + message_row.height,
            height: BUTTON_HEIGHT.min(inner.height.saturating_sub(viewport.height + 1)),
            ..inner
        };

        let target = self.locate()?;
        let mut heights = Vec::with_capacity(self.children.len());
        for child in &self.children {
            heights.push(child.height()?);
        }
        let offset = scroll_offset(&heights, target.map(|t| t.child), viewport.height);

        let mut top = 0u16;
        for (index, (child, height)) in self.children.iter().zip(&heights).enumerate() {
            let child_top = top;
            top = top.saturating_add(*height);
            if child_top < offset {
                continue;
            }
            let y = child_top - offset;
            if y >= viewport.height {
                break;
            }
            let child_area = Rect {
                y: viewport.y + y,
                height: (*height).min(viewport.height - y),
                ..viewport
            };
            let focus = target.filter(|t| t.child == index).map(|t| t.local);
            child.draw(frame, child_area, focus)?;
        }

        let root_error = self
            .state
            .borrow()
            .errors()
            .first(ROOT_ERROR_KEY)
            .map(str::to_string);
        if message_row.height > 0 {
            draw_message(frame, message_row, root_error.as_deref());
        }

        if button_row.height > 0 {
            let width = button_width(&self.submit_label).min(button_row.width);
            render_colored_button(
                frame,
                Rect {
                    width,
                    ..button_row
                },
                &self.submit_label,
                target.is_none(),
                true,
                Color::Green,
            );
        }
        Ok(())
    }
}

fn rows_spanned(heights: &[u16]) -> u16 {
    heights.iter().fold(0, |total, h| total.saturating_add(*h))
}

/// First visible row so the focused child fits in `viewport` rows
fn scroll_offset(heights: &[u16], focused: Option<usize>, viewport: u16) -> u16 {
    let Some(focused) = focused else {
        // Submit button focused: show the end of the form
        let total = rows_spanned(heights);
        return total.saturating_sub(viewport);
    };
    let top = rows_spanned(&heights[..focused]);
    let bottom = top.saturating_add(heights[focused]);
    if bottom <= viewport {
        0
    } else if heights[focused] > viewport {
        top
    } else {
        bottom - viewport
    }
}
