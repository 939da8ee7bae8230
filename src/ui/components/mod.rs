//! Reusable UI components

mod button;
mod dialog;

pub use button::{button_width, render_button, render_colored_button, BUTTON_HEIGHT};
pub use dialog::{render_dialog, render_error_dialog, render_submission_dialog, DialogConfig};
