//! Form errors and per-field validation messages

use std::collections::BTreeMap;
use thiserror::Error;

/// Key used for errors that do not belong to a single field
pub const ROOT_ERROR_KEY: &str = "root";

/// Errors raised by the form layer itself.
///
/// Validation failures are not errors in this sense: they are collected in
/// [`FieldErrors`] and displayed next to their field.
#[derive(Debug, Error)]
pub enum FormError {
    /// A field component was rendered without an enclosing form
    #[error("{component} must be used within a CustomForm")]
    MissingContext { component: &'static str },

    #[error("invalid field path `{0}`")]
    InvalidPath(String),

    #[error("field `{path}` is not a list")]
    NotAList { path: String },

    #[error("index {index} is out of bounds for `{path}` (length {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Validation messages keyed by dot path, kept in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single form-level message
    pub fn root(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(ROOT_ERROR_KEY, message);
        errors
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// The message shown for a field (the first one reported)
    pub fn first(&self, path: &str) -> Option<&str> {
        self.entries
            .get(path)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn get(&self, path: &str) -> &[String] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<String>> {
        self.entries.remove(path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    /// Rewrite every key, dropping the ones the closure rejects
    pub(crate) fn rekey(&mut self, mut f: impl FnMut(&str) -> Option<String>) {
        let entries = std::mem::take(&mut self.entries);
        for (path, messages) in entries {
            if let Some(new_path) = f(&path) {
                self.entries.entry(new_path).or_default().extend(messages);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_returns_earliest_message() {
        let mut errors = FieldErrors::new();
        errors.push("name", "Too short");
        errors.push("name", "Must be digits");
        assert_eq!(errors.first("name"), Some("Too short"));
        assert_eq!(errors.get("name").len(), 2);
    }

    #[test]
    fn test_missing_path_has_no_messages() {
        let errors = FieldErrors::new();
        assert!(errors.first("name").is_none());
        assert!(errors.get("name").is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_root_error() {
        let errors = FieldErrors::root("bad payload");
        assert_eq!(errors.first(ROOT_ERROR_KEY), Some("bad payload"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_paths_are_sorted() {
        let mut errors = FieldErrors::new();
        errors.push("select", "x");
        errors.push("file", "y");
        errors.push("input2", "z");
        let paths: Vec<&str> = errors.paths().collect();
        assert_eq!(paths, vec!["file", "input2", "select"]);
    }

    #[test]
    fn test_rekey_drops_and_renames() {
        let mut errors = FieldErrors::new();
        errors.push("items.0.name", "a");
        errors.push("items.1.name", "b");
        errors.rekey(|path| match path {
            "items.0.name" => None,
            "items.1.name" => Some("items.0.name".to_string()),
            other => Some(other.to_string()),
        });
        assert_eq!(errors.first("items.0.name"), Some("b"));
        assert!(!errors.contains("items.1.name"));
    }

    #[test]
    fn test_missing_context_message() {
        let err = FormError::MissingContext {
            component: "FormInput",
        };
        assert_eq!(err.to_string(), "FormInput must be used within a CustomForm");
    }
}
