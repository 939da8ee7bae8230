//! Demo application state and key handling

use crate::config::FormKitConfig;
use crate::platform::PASTE_MODIFIER;
use crate::screens::{home_form, ExampleForm};
use crate::ui::{CustomForm, FormEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Window in which a second Ctrl+C quits
const QUIT_WINDOW: Duration = Duration::from_millis(1000);

/// Main application struct
pub struct App {
    /// The example form
    pub form: CustomForm<ExampleForm>,
    pub config: FormKitConfig,
    /// Values of the latest accepted submission, filled by the submit callback
    last_submission: Rc<RefCell<Option<ExampleForm>>>,
    /// Pretty-printed values shown after a successful submit
    pub submission_dialog: Option<String>,
    /// Errors waiting to be shown, oldest first
    errors: VecDeque<String>,
    /// Transient feedback in the status bar
    pub status_message: Option<String>,
    /// Whether the app should quit
    quit: bool,
    /// Timestamp of last Ctrl+C press for double-tap quit
    last_ctrl_c: Option<Instant>,
}

impl App {
    pub fn new(config: FormKitConfig) -> Result<Self> {
        let last_submission = Rc::new(RefCell::new(None));
        let sink = last_submission.clone();
        let form = home_form(
            move |values| {
                *sink.borrow_mut() = Some(values);
            },
            &config,
        )?;

        Ok(Self {
            form,
            config,
            last_submission,
            submission_dialog: None,
            errors: VecDeque::new(),
            status_message: None,
            quit: false,
            last_ctrl_c: None,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Queue an error message for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.errors.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// The latest accepted submission
    pub fn last_submission(&self) -> Option<ExampleForm> {
        self.last_submission.borrow().clone()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if key.code == KeyCode::Char('c') && ctrl {
            self.handle_ctrl_c();
            return Ok(());
        }

        // Error dialog is modal
        if self.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_error();
            }
            return Ok(());
        }

        if self.submission_dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.submission_dialog = None;
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        if key.code == KeyCode::Char('v') && key.modifiers.contains(PASTE_MODIFIER) {
            self.paste_from_clipboard()?;
            return Ok(());
        }

        if key.code == KeyCode::Char('r') && ctrl {
            self.form.reset();
            self.status_message = Some("Form reset".to_string());
            return Ok(());
        }

        match self.form.handle_key(key)? {
            FormEvent::Submitted => self.show_submission()?,
            FormEvent::Invalid { error_count } => {
                self.status_message = Some(format!("Fix {error_count} invalid field(s)"));
            }
            FormEvent::Handled | FormEvent::Ignored => {}
        }
        Ok(())
    }

    /// Insert text into the focused field (bracketed paste or clipboard)
    pub fn paste(&mut self, text: &str) -> Result<()> {
        if self.current_error().is_some() || self.submission_dialog.is_some() {
            return Ok(());
        }
        if !self.form.paste(text)? {
            self.status_message = Some("Nothing to paste into here".to_string());
        }
        Ok(())
    }

    fn paste_from_clipboard(&mut self) -> Result<()> {
        match read_clipboard() {
            Ok(text) => self.paste(&text),
            Err(err) => {
                self.push_error(format!("Clipboard unavailable: {err}"));
                Ok(())
            }
        }
    }

    fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        match self.last_ctrl_c {
            Some(previous) if now.duration_since(previous) <= QUIT_WINDOW => {
                self.quit = true;
            }
            _ => {
                self.last_ctrl_c = Some(now);
                self.status_message = Some("Press Ctrl+C again to quit".to_string());
            }
        }
    }

    fn show_submission(&mut self) -> Result<()> {
        if let Some(values) = self.last_submission.borrow().as_ref() {
            self.submission_dialog = Some(serde_json::to_string_pretty(values)?);
        }
        self.status_message = Some("Form submitted".to_string());
        Ok(())
    }
}

fn read_clipboard() -> Result<String> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    Ok(clipboard.get_text()?)
}
