//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while working with events and recurrence rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The recurrence rule could not be turned into an occurrence set.
    #[error("Invalid recurrence rule for event {uid}: {message}")]
    InvalidRecurrence { uid: String, message: String },
}

impl CoreError {
    /// Creates an invalid recurrence error.
    pub fn invalid_recurrence(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecurrence {
            uid: uid.into(),
            message: message.into(),
        }
    }
}
