//! Change contexts.
//!
//! A change context carries what the engine needs to know about the write
//! that produced a batch of scheduling messages: the events as they were
//! before the write and who made it. It is created by
//! [`SchedulingEngine::begin_change`](crate::SchedulingEngine::begin_change)
//! before the stored object is overwritten, shared by every message of that
//! write, and dropped afterwards.

use imip_core::EventSnapshot;
use serde::Deserialize;

use crate::error::{SchedulerError, SchedulerResult};

/// Turns the stored bytes of a calendar object into event snapshots.
pub trait SnapshotDecoder: Send + Sync {
    /// Decodes every event (master and overridden instances) of an object.
    fn decode(&self, bytes: &[u8]) -> SchedulerResult<Vec<EventSnapshot>>;
}

impl<F> SnapshotDecoder for F
where
    F: Fn(&[u8]) -> SchedulerResult<Vec<EventSnapshot>> + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> SchedulerResult<Vec<EventSnapshot>> {
        self(bytes)
    }
}

/// Decodes objects stored as JSON: one snapshot or an array of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotDecoder;

impl SnapshotDecoder for JsonSnapshotDecoder {
    fn decode(&self, bytes: &[u8]) -> SchedulerResult<Vec<EventSnapshot>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Many(Vec<EventSnapshot>),
            One(Box<EventSnapshot>),
        }

        match serde_json::from_slice(bytes) {
            Ok(Stored::Many(events)) => Ok(events),
            Ok(Stored::One(event)) => Ok(vec![*event]),
            Err(e) => Err(SchedulerError::decode(e.to_string())),
        }
    }
}

/// State of one write, shared by the messages it produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeContext {
    previous: Vec<EventSnapshot>,
    acting_user: Option<String>,
}

impl ChangeContext {
    /// A context for a write that created a new object.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for a write that replaced `previous`.
    pub fn with_previous(previous: Vec<EventSnapshot>) -> Self {
        Self {
            previous,
            acting_user: None,
        }
    }

    /// Builder: display name of the user performing the write.
    pub fn with_acting_user(mut self, name: impl Into<String>) -> Self {
        self.acting_user = Some(name.into());
        self
    }

    /// Returns the acting user's display name.
    pub fn acting_user(&self) -> Option<&str> {
        self.acting_user.as_deref()
    }

    /// Returns `true` if the write replaced an existing object.
    pub fn has_previous(&self) -> bool {
        !self.previous.is_empty()
    }

    /// Finds the previous version of the event with `uid` and `recurrence_id`.
    pub fn previous_for(&self, uid: &str, recurrence_id: Option<&str>) -> Option<&EventSnapshot> {
        self.previous
            .iter()
            .find(|e| e.uid == uid && e.recurrence_id.as_deref() == recurrence_id)
    }
}
