//! Scheduler error types.

use std::io;
use thiserror::Error;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors that can occur around the scheduling engine.
///
/// None of these escape [`crate::SchedulingEngine::schedule`]; they are
/// folded into the message's status there.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A previous calendar object could not be decoded.
    #[error("Failed to decode calendar object: {message}")]
    Decode { message: String },

    /// The mail transport failed as a whole.
    #[error("Mail transport error: {message}")]
    Transport { message: String },

    /// An invitation token could not be stored.
    #[error("Token store error: {message}")]
    TokenStore { message: String },
}

impl SchedulerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a token store error.
    pub fn token_store(message: impl Into<String>) -> Self {
        Self::TokenStore {
            message: message.into(),
        }
    }
}
