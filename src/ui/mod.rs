//! UI module for rendering the TUI

pub mod components;
mod custom_form;
pub mod fields;
mod layout;

pub use custom_form::{CustomForm, FormEvent, DEFAULT_SUBMIT_LABEL};

use crate::app::App;
use crate::form::FormError;
use components::{render_error_dialog, render_submission_dialog};
use ratatui::{layout::Margin, Frame};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) -> Result<(), FormError> {
    let (content_area, status_area) = layout::create_layout(frame.area());

    app.form.draw(
        frame,
        content_area.inner(Margin {
            horizontal: 1,
            vertical: 0,
        }),
    )?;
    layout::draw_status_bar(frame, status_area, app);

    // Dialogs draw last so they overlay everything
    if let Some(error) = app.current_error() {
        render_error_dialog(frame, error);
    } else if let Some(values) = &app.submission_dialog {
        render_submission_dialog(frame, values);
    }
    Ok(())
}
