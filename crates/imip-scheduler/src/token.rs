//! Invitation tokens.
//!
//! A token lets an attendee answer an invitation from a link without logging
//! in. The record stored next to it ties the answer back to the invitation
//! and expires once the event is over.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SchedulerResult;
use crate::message::SchedulingMessage;

/// Length of issued tokens.
pub const TOKEN_LENGTH: usize = 60;

/// Characters tokens are drawn from.
pub const TOKEN_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Source of unpredictable strings.
pub trait SecureRandom: Send + Sync {
    /// Returns `length` characters drawn from `alphabet`.
    fn generate(&self, length: usize, alphabet: &str) -> String;
}

/// [`SecureRandom`] backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl SecureRandom for ThreadRandom {
    fn generate(&self, length: usize, alphabet: &str) -> String {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let mut rng = rand::rng();
        (0..length)
            .map(|_| chars[rng.random_range(0..chars.len())])
            .collect()
    }
}

/// Correlation record of one issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationToken {
    pub token: String,
    /// Calendar address of the invited attendee.
    pub attendee: String,
    /// Calendar address of the organizer.
    pub organizer: String,
    pub sequence: u32,
    pub recurrence_id: Option<String>,
    /// Answers are rejected after this instant.
    pub expires_at: DateTime<Utc>,
    pub uid: String,
}

/// Durable storage of token records.
pub trait TokenStore: Send + Sync {
    /// Inserts a new record.
    fn insert(&self, token: &InvitationToken) -> SchedulerResult<()>;
}

/// Generates and persists invitation tokens.
pub struct TokenIssuer<'a> {
    random: &'a dyn SecureRandom,
    store: &'a dyn TokenStore,
}

impl<'a> TokenIssuer<'a> {
    pub fn new(random: &'a dyn SecureRandom, store: &'a dyn TokenStore) -> Self {
        Self { random, store }
    }

    /// Issues a token for the recipient of `message`, valid until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the record cannot be inserted.
    pub fn issue(
        &self,
        message: &SchedulingMessage,
        expires_at: DateTime<Utc>,
    ) -> SchedulerResult<InvitationToken> {
        let token = InvitationToken {
            token: self.random.generate(TOKEN_LENGTH, TOKEN_ALPHABET),
            attendee: message.recipient.clone(),
            organizer: message.sender.clone(),
            sequence: message.sequence,
            recurrence_id: message.event.recurrence_id.clone(),
            expires_at,
            uid: message.event.uid.clone(),
        };
        self.store.insert(&token)?;
        debug!(uid = %token.uid, attendee = %token.attendee, "Issued invitation token");
        Ok(token)
    }
}
