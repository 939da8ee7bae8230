//! Example screen: every field kind in one form

use crate::config::FormKitConfig;
use crate::form::{FormError, UploadSlot};
use crate::ui::fields::{
    Component, FormCheckbox, FormFieldArray, FormFileInput, FormInput, FormSelect, FormTextArea,
    SelectOption,
};
use crate::ui::CustomForm;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Largest accepted upload, in bytes
pub const MAX_FILE_SIZE: u64 = 500_000;

pub const ACCEPTED_TYPES: &[&str] =
    &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"];

static NINE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("nine-digit pattern compiles"));

/// One entry of the repeatable "Horses" group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct InlineEntry {
    pub checkbox: bool,
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ObjectElement {
    pub obj1: String,
    pub obj2: String,
}

/// Values of the example form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExampleForm {
    #[validate(custom(function = "validate_upload"))]
    pub file: UploadSlot,
    #[validate(length(min = 1, message = "Please select an option."))]
    pub select: String,
    #[validate(length(min = 1, message = "Please fill in this field."))]
    pub textarea: String,
    pub checkbox: bool,
    #[validate(custom(function = "validate_short_text"))]
    pub input2: String,
    #[validate(
        length(min = 1, message = "Please enter a value."),
        regex(path = *NINE_DIGITS, message = "Must be exactly 9 digits.")
    )]
    pub input_regex: String,
    pub object_element: ObjectElement,
    pub array_element: Vec<InlineEntry>,
}

impl Default for ExampleForm {
    fn default() -> Self {
        Self {
            file: UploadSlot::default(),
            select: String::new(),
            textarea: String::new(),
            checkbox: false,
            input2: String::new(),
            input_regex: String::new(),
            object_element: ObjectElement::default(),
            array_element: vec![InlineEntry::default()],
        }
    }
}

fn rejection(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// A file must be picked, fit in [`MAX_FILE_SIZE`] and be a spreadsheet
fn validate_upload(slot: &UploadSlot) -> Result<(), ValidationError> {
    let Some(file) = slot.file() else {
        return Err(rejection("required", "Please select a file."));
    };
    if file.size > MAX_FILE_SIZE {
        return Err(rejection("file_size", "Max file size is 500 KB."));
    }
    if !ACCEPTED_TYPES.contains(&file.mime.as_str()) {
        return Err(rejection("file_type", "Only xlsx files are accepted."));
    }
    Ok(())
}

/// Between one and three characters, with a message for each bound
fn validate_short_text(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < 1 {
        return Err(rejection("length", "Min 1"));
    }
    if len > 3 {
        return Err(rejection("length", "Max 3"));
    }
    Ok(())
}

/// Build the example form, calling `on_submit` with each valid submission
pub fn home_form(
    on_submit: impl FnMut(ExampleForm) + 'static,
    config: &FormKitConfig,
) -> Result<CustomForm<ExampleForm>, FormError> {
    let mut textarea = FormTextArea::new("textarea", "Textarea", "Write something...");
    if let Some(rows) = config.textarea_rows {
        textarea = textarea.rows(rows);
    }

    let options = (1..=4)
        .map(|n| SelectOption::new(format!("Option {n}"), n.to_string()))
        .collect();

    let form = CustomForm::new(&ExampleForm::default(), on_submit)?
        .title("Example form")
        .description("This is an example form with all the components.")
        .submit_label(config.submit_label_or_default())
        .child(FormSelect::new("select", "Select Options", "Options", options))
        .child(FormCheckbox::new("checkbox", "Checkbox"))
        .child(FormInput::new("input_regex", "Input Regex", "Value"))
        .child(FormInput::new("object_element.obj1", "Object 1", "Object"))
        .child(FormInput::new("input2", "Input 2", "Object"))
        .child(textarea)
        .child(horses())
        .child(FormFileInput::new("file", "File").accept(ACCEPTED_TYPES[0]));
    Ok(form)
}

/// The repeatable group: one input and one checkbox per entry
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
    .append_label("Append")
}
