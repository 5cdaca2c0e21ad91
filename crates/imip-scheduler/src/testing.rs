//! Test doubles for the engine's collaborators.
//!
//! Each double is cheap to clone and shares its state between clones, so a
//! test can hand one clone to the engine and inspect another afterwards.

use std::sync::{Arc, Mutex};

use crate::compose::Notification;
use crate::error::{SchedulerError, SchedulerResult};
use crate::token::{InvitationToken, SecureRandom, TokenStore};
use crate::transport::MailTransport;

#[derive(Debug, Default)]
struct TransportState {
    sent: Vec<Notification>,
    invalid: Vec<String>,
    unreachable: bool,
    broken: bool,
}

/// Records sent notifications instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<TransportState>>,
}

impl RecordingTransport {
    /// Rejects `address` during validation.
    pub fn rejecting(self, address: &str) -> Self {
        self.state.lock().unwrap().invalid.push(address.to_string());
        self
    }

    /// Reports every recipient as unreachable.
    pub fn unreachable(self) -> Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }

    /// Fails every send with a transport error.
    pub fn broken(self) -> Self {
        self.state.lock().unwrap().broken = true;
        self
    }

    /// Notifications handed to the transport, in order.
    pub fn sent(&self) -> Vec<Notification> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl MailTransport for RecordingTransport {
    fn validate_address(&self, address: &str) -> bool {
        !address.is_empty()
            && address.contains('@')
            && !self.state.lock().unwrap().invalid.iter().any(|a| a == address)
    }

    fn send(&self, notification: &Notification) -> SchedulerResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.sent.push(notification.clone());
        if state.broken {
            return Err(SchedulerError::transport("connection refused"));
        }
        if state.unreachable {
            return Ok(vec![notification.to.address.clone()]);
        }
        Ok(Vec::new())
    }
}

/// Keeps token records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<Vec<InvitationToken>>>,
    failing: bool,
}

impl MemoryTokenStore {
    /// A store that rejects every insert.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Stored records, in insertion order.
    pub fn tokens(&self) -> Vec<InvitationToken> {
        self.tokens.lock().unwrap().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn insert(&self, token: &InvitationToken) -> SchedulerResult<()> {
        if self.failing {
            return Err(SchedulerError::token_store("database is read-only"));
        }
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }
}

/// Repeats one character.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub char);

impl SecureRandom for FixedRandom {
    fn generate(&self, length: usize, _alphabet: &str) -> String {
        std::iter::repeat_n(self.0, length).collect()
    }
}
