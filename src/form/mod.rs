//! Form domain layer
//!
//! Values are kept as a JSON record addressed by dot paths, validated by a
//! [`Schema`] on submit, and shared with field components through the
//! ambient [`context`].

pub mod context;
mod errors;
mod form_state;
pub mod path;
mod schema;
mod upload;

pub use context::{provide, use_form, with_form, FormHandle, ProviderGuard};
pub use errors::{FieldErrors, FormError, ROOT_ERROR_KEY};
pub use form_state::{ArrayEntry, FieldState, FormControl, FormState, SubmitOutcome};
pub use path::{FieldPath, Segment};
pub use schema::{flatten, Schema};
pub use upload::{FileInspector, FileUpload, FsInspector, UploadSlot};

#[cfg(test)]
pub use upload::MockFileInspector;
