//! Ambient form context
//!
//! A [`CustomForm`](crate::ui::CustomForm) provides its handle while it draws
//! and handles input; field components look it up with [`use_form`] instead
//! of having the form passed down to them.

use super::errors::FormError;
use super::form_state::FormControl;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

/// Shared handle to a form of any schema
pub type FormHandle = Rc<RefCell<dyn FormControl>>;

thread_local! {
    static FORM_STACK: RefCell<Vec<FormHandle>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a form provided until dropped
#[must_use = "the form is only provided while the guard is alive"]
pub struct ProviderGuard {
    // The stack is per thread, so the guard must stay on this one
    _not_send: PhantomData<*const ()>,
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        FORM_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Make `handle` the current form until the guard is dropped
pub fn provide(handle: FormHandle) -> ProviderGuard {
    FORM_STACK.with(|stack| stack.borrow_mut().push(handle));
    ProviderGuard {
        _not_send: PhantomData,
    }
}

/// Run `f` with `handle` provided
pub fn with_form<R>(handle: &FormHandle, f: impl FnOnce() -> R) -> R {
    let _guard = provide(handle.clone());
    f()
}

/// Look up the innermost provided form.
///
/// `component` names the caller for the error raised when no form encloses
/// it; that is a composition mistake, not something to recover from.
pub fn use_form(component: &'static str) -> Result<FormHandle, FormError> {
    FORM_STACK
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(FormError::MissingContext { component })
}

/// Whether any form is currently provided
pub fn has_form() -> bool {
    FORM_STACK.with(|stack| !stack.borrow().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use validator::Validate;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    struct Note {
        text: String,
    }

    fn handle_with_text(text: &str) -> FormHandle {
        let state = FormState::<Note>::from_values(json!({ "text": text }), |_| {});
        Rc::new(RefCell::new(state))
    }

    #[test]
    fn test_use_form_outside_provider_fails() {
        let err = use_form("FormInput").err().unwrap();
        assert!(matches!(
            err,
            FormError::MissingContext {
                component: "FormInput"
            }
        ));
        assert_eq!(err.to_string(), "FormInput must be used within a CustomForm");
    }

    #[test]
    fn test_use_form_inside_provider() {
        let handle = handle_with_text("hello");
        with_form(&handle, || {
            let form = use_form("FormInput").unwrap();
            assert_eq!(form.borrow().value("text").unwrap(), json!("hello"));
        });
    }

    #[test]
    fn test_guard_pops_on_drop() {
        let handle = handle_with_text("a");
        {
            let _guard = provide(handle);
            assert!(has_form());
        }
        assert!(!has_form());
    }

    #[test]
    fn test_innermost_form_wins() {
        let outer = handle_with_text("outer");
        let inner = handle_with_text("inner");
        with_form(&outer, || {
            with_form(&inner, || {
                let form = use_form("FormInput").unwrap();
                assert_eq!(form.borrow().value("text").unwrap(), json!("inner"));
            });
            let form = use_form("FormInput").unwrap();
            assert_eq!(form.borrow().value("text").unwrap(), json!("outer"));
        });
    }

    #[test]
    fn test_writes_through_context_reach_the_form() {
        let handle = handle_with_text("");
        with_form(&handle, || {
            let form = use_form("FormInput").unwrap();
            form.borrow_mut().set_value("text", json!("typed")).unwrap();
        });
        assert_eq!(handle.borrow().value("text").unwrap(), json!("typed"));
    }
}
