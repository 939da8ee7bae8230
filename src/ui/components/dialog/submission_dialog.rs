//! Dialog showing the values a form was submitted with

use super::base::{render_dialog, DialogConfig};
use super::error_dialog::dismiss_hint;
use ratatui::{style::Color, Frame};

/// Render the submitted values (pretty-printed JSON) in a dialog
pub fn render_submission_dialog(frame: &mut Frame, values_json: &str) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Form submitted",
            title_color: Color::Green,
            border_color: Color::Green,
            message: values_json,
            preformatted: true,
            hint: Some(dismiss_hint()),
            max_width: 80,
        },
    );
}
