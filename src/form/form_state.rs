//! Form state management: values, errors, touched/dirty tracking,
//! field arrays and the submit lifecycle

use super::errors::{FieldErrors, FormError};
use super::path::{join_path, shift_after_remove, FieldPath};
use super::schema::Schema;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use uuid::Uuid;

/// Snapshot of one field as seen by a field component
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub value: Value,
    /// First validation message, if any
    pub error: Option<String>,
    pub is_dirty: bool,
    pub is_touched: bool,
}

impl FieldState {
    pub fn as_text(&self) -> &str {
        self.value.as_str().unwrap_or("")
    }

    pub fn as_bool(&self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }
}

/// One entry of a repeatable field group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayEntry {
    /// Stable key for the entry, unchanged when other entries move
    pub id: Uuid,
    pub index: usize,
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Invalid { error_count: usize },
}

/// Operations field components perform on their form.
///
/// Object safe so a form of any schema can be shared through the context.
pub trait FormControl {
    fn values(&self) -> &Value;

    /// Value at a dot path, `Null` when absent
    fn value(&self, name: &str) -> Result<Value, FormError>;

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), FormError>;

    fn mark_touched(&mut self, name: &str);

    fn field_state(&self, name: &str) -> Result<FieldState, FormError>;

    fn errors(&self) -> &FieldErrors;

    fn set_error(&mut self, name: &str, message: String);

    fn clear_errors(&mut self, name: &str);

    /// Entries of the list at `name`, with stable ids
    fn field_entries(&mut self, name: &str) -> Result<Vec<ArrayEntry>, FormError>;

    fn append(&mut self, name: &str, value: Value) -> Result<(), FormError>;

    fn remove(&mut self, name: &str, index: usize) -> Result<(), FormError>;

    /// Validate and, when valid, hand the values to the submit callback.
    /// The callback runs inside this borrow; forms shared through a
    /// `RefCell` submit with [`FormState::submit_shared`].
    fn submit(&mut self) -> SubmitOutcome;

    fn reset(&mut self);

    fn submit_count(&self) -> u32;
}

/// State of one form bound to schema `S`
pub struct FormState<S> {
    defaults: Value,
    values: Value,
    errors: FieldErrors,
    touched: BTreeSet<String>,
    array_ids: BTreeMap<String, Vec<Uuid>>,
    submit_count: u32,
    last_submitted_at: Option<DateTime<Utc>>,
    /// Taken out while it runs so the form can be borrowed from inside it
    on_submit: Option<Box<dyn FnMut(S)>>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> FormState<S> {
    /// Create a form from typed default values
    pub fn new<T>(defaults: &T, on_submit: impl FnMut(S) + 'static) -> Result<Self, FormError>
    where
        T: Serialize,
    {
        Ok(Self::from_values(serde_json::to_value(defaults)?, on_submit))
    }

    /// Create a form from a raw values record
    pub fn from_values(defaults: Value, on_submit: impl FnMut(S) + 'static) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            array_ids: BTreeMap::new(),
            submit_count: 0,
            last_submitted_at: None,
            on_submit: Some(Box::new(on_submit)),
            _schema: PhantomData,
        }
    }

    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    pub fn last_submitted_at(&self) -> Option<DateTime<Utc>> {
        self.last_submitted_at
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.defaults
    }

    pub fn is_submitted(&self) -> bool {
        self.submit_count > 0
    }

    /// Re-run the schema without submitting
    pub fn validate(&mut self) -> bool {
        match S::resolve(&self.values) {
            Ok(_) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Submit a form that is shared through a `RefCell`.
    ///
    /// The borrow is released before the callback runs, so the callback may
    /// reach the same form (through [`use_form`](crate::form::use_form) or
    /// the handle) to reset or update it.
    pub fn submit_shared(state: &RefCell<Self>) -> SubmitOutcome {
        let (values, callback) = {
            let mut form = state.borrow_mut();
            match form.resolve_submission() {
                Ok(values) => (values, form.on_submit.take()),
                Err(error_count) => return SubmitOutcome::Invalid { error_count },
            }
        };
        if let Some(mut callback) = callback {
            callback(values);
            let mut form = state.borrow_mut();
            if form.on_submit.is_none() {
                form.on_submit = Some(callback);
            }
        }
        SubmitOutcome::Submitted
    }

    /// Count the attempt and validate; on failure keep the errors and mark
    /// the failing paths touched
    fn resolve_submission(&mut self) -> Result<S, usize> {
        self.submit_count += 1;
        match S::resolve(&self.values) {
            Ok(values) => {
                self.errors.clear();
                self.last_submitted_at = Some(Utc::now());
                tracing::info!("Form submitted (attempt {})", self.submit_count);
                Ok(values)
            }
            Err(errors) => {
                let error_count = errors.len();
                for path in errors.paths() {
                    self.touched.insert(path.to_string());
                }
                tracing::warn!("Form submission rejected with {error_count} invalid field(s)");
                self.errors = errors;
                Err(error_count)
            }
        }
    }

    fn ids_for(&mut self, name: &str, len: usize) -> &mut Vec<Uuid> {
        let ids = self.array_ids.entry(name.to_string()).or_default();
        if ids.len() != len {
            ids.resize_with(len, Uuid::new_v4);
        }
        ids
    }
}

impl<S: Schema> FormControl for FormState<S> {
    fn values(&self) -> &Value {
        &self.values
    }

    fn value(&self, name: &str) -> Result<Value, FormError> {
        let path = FieldPath::parse(name)?;
        Ok(path.get(&self.values).cloned().unwrap_or(Value::Null))
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        let path = FieldPath::parse(name)?;
        tracing::debug!("Setting form value {name} = {value}");
        path.set(&mut self.values, value)?;
        // Once submitted, changes re-validate so stale messages go away
        if self.is_submitted() {
            self.validate();
        }
        Ok(())
    }

    fn mark_touched(&mut self, name: &str) {
        self.touched.insert(name.to_string());
    }

    fn field_state(&self, name: &str) -> Result<FieldState, FormError> {
        let path = FieldPath::parse(name)?;
        let value = path.get(&self.values).cloned().unwrap_or(Value::Null);
        let default = path.get(&self.defaults).unwrap_or(&Value::Null);
        Ok(FieldState {
            is_dirty: &value != default,
            error: self.errors.first(name).map(str::to_string),
            is_touched: self.touched.contains(name),
            value,
        })
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn set_error(&mut self, name: &str, message: String) {
        self.errors.remove(name);
        self.errors.push(name, message);
    }

    fn clear_errors(&mut self, name: &str) {
        self.errors.remove(name);
    }

    fn field_entries(&mut self, name: &str) -> Result<Vec<ArrayEntry>, FormError> {
        let path = FieldPath::parse(name)?;
        let len = path.list_mut(&mut self.values)?.len();
        Ok(self
            .ids_for(name, len)
            .iter()
            .enumerate()
            .map(|(index, id)| ArrayEntry { id: *id, index })
            .collect())
    }

    fn append(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        let path = FieldPath::parse(name)?;
        let list = path.list_mut(&mut self.values)?;
        let previous_len = list.len();
        list.push(value);
        self.ids_for(name, previous_len).push(Uuid::new_v4());
        tracing::info!("Appended entry {previous_len} to {name}");
        if self.is_submitted() {
            self.validate();
        }
        Ok(())
    }

    fn remove(&mut self, name: &str, index: usize) -> Result<(), FormError> {
        let path = FieldPath::parse(name)?;
        let list = path.list_mut(&mut self.values)?;
        let len = list.len();
        if index >= len {
            return Err(FormError::IndexOutOfBounds {
                path: name.to_string(),
                index,
                len,
            });
        }
        list.remove(index);
        self.ids_for(name, len).remove(index);

        self.errors
            .rekey(|key| shift_after_remove(key, name, index));
        self.touched = std::mem::take(&mut self.touched)
            .into_iter()
            .filter_map(|key| shift_after_remove(&key, name, index))
            .collect();
        let nested_prefix = join_path(name, "");
        let nested_arrays: Vec<String> = self
            .array_ids
            .keys()
            .filter(|key| key.starts_with(&nested_prefix))
            .cloned()
            .collect();
        for key in nested_arrays {
            if let Some(ids) = self.array_ids.remove(&key) {
                if let Some(new_key) = shift_after_remove(&key, name, index) {
                    self.array_ids.insert(new_key, ids);
                }
            }
        }

        tracing::info!("Removed entry {index} from {name}");
        if self.is_submitted() {
            self.validate();
        }
        Ok(())
    }

    fn submit(&mut self) -> SubmitOutcome {
        match self.resolve_submission() {
            Ok(values) => {
                if let Some(callback) = self.on_submit.as_mut() {
                    callback(values);
                }
                SubmitOutcome::Submitted
            }
            Err(error_count) => SubmitOutcome::Invalid { error_count },
        }
    }

    fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.touched.clear();
        self.array_ids.clear();
        self.submit_count = 0;
        self.last_submitted_at = None;
    }

    fn submit_count(&self) -> u32 {
        self.submit_count
    }
}
