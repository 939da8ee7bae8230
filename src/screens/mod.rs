//! Application screens built from the form kit

mod home;

pub use home::{home_form, ExampleForm, InlineEntry, ObjectElement, ACCEPTED_TYPES, MAX_FILE_SIZE};
