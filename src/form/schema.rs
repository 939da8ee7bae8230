//! Schema resolution: decode the values record and run `validator` rules

use super::errors::FieldErrors;
use super::path::join_path;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// A type describing the shape and validation rules of a form's values.
///
/// Any serde type deriving [`Validate`] is a schema.
pub trait Schema: Sized {
    /// Decode and validate the raw values record
    fn resolve(values: &Value) -> Result<Self, FieldErrors>;
}

impl<T> Schema for T
where
    T: DeserializeOwned + Validate,
{
    fn resolve(values: &Value) -> Result<Self, FieldErrors> {
        let decoded: T = serde_json::from_value(values.clone())
            .map_err(|err| FieldErrors::root(format!("Invalid form values: {err}")))?;
        decoded.validate().map_err(|errors| flatten(&errors))?;
        Ok(decoded)
    }
}

/// Flatten nested `validator` errors into dot-path keyed messages
pub fn flatten(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect("", errors, &mut out);
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(path.clone(), message_for(error));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect(&join_path(&path, index), nested, out);
                }
            }
        }
    }
}

/// The rule's own message, or a generic one derived from its code
fn message_for(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "required" => "This field is required.".to_string(),
        "length" => "Invalid length.".to_string(),
        "range" => "Value is out of range.".to_string(),
        "email" => "Invalid email address.".to_string(),
        "url" => "Invalid URL.".to_string(),
        "regex" => "Invalid format.".to_string(),
        code => format!("Invalid value ({code})."),
    }
}
