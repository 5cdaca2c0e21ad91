//! Scheduling messages.

use std::fmt;

use imip_core::EventSnapshot;

use crate::status::ScheduleStatus;

/// Scheduling method of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Request,
    Reply,
    Cancel,
    /// Any other method; handled like a request.
    Other(String),
}

impl Method {
    /// Parses a method name, ignoring case.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "REQUEST" => Self::Request,
            "REPLY" => Self::Reply,
            "CANCEL" => Self::Cancel,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the protocol name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Request => "REQUEST",
            Self::Reply => "REPLY",
            Self::Cancel => "CANCEL",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduling message, addressed to one recipient.
///
/// The status is an output: the engine records it at most once per call, and
/// a default status only lands when nothing upstream set one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingMessage {
    pub method: Method,
    /// Calendar address of the sender (`mailto:` URI).
    pub sender: String,
    /// Calendar address of the recipient (`mailto:` URI).
    pub recipient: String,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub sequence: u32,
    /// Set by the broker when the change is worth notifying about.
    pub significant_change: bool,
    /// The event as it is after the change.
    pub event: EventSnapshot,
    /// Serialized calendar object attached to the notification.
    pub payload: String,
    status: Option<ScheduleStatus>,
}

impl SchedulingMessage {
    /// Creates a significant message with an empty payload.
    pub fn new(
        method: Method,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        event: EventSnapshot,
    ) -> Self {
        Self {
            method,
            sender: sender.into(),
            recipient: recipient.into(),
            sender_name: None,
            recipient_name: None,
            sequence: 0,
            significant_change: true,
            event,
            payload: String::new(),
            status: None,
        }
    }

    /// Builder: set the sender display name.
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    /// Builder: set the recipient display name.
    pub fn with_recipient_name(mut self, name: impl Into<String>) -> Self {
        self.recipient_name = Some(name.into());
        self
    }

    /// Builder: set the sequence number.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Builder: set the significance flag.
    pub fn with_significant_change(mut self, significant: bool) -> Self {
        self.significant_change = significant;
        self
    }

    /// Builder: set the serialized calendar object.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Builder: a status set upstream.
    pub fn with_status(mut self, status: ScheduleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the recorded status.
    pub fn status(&self) -> Option<&ScheduleStatus> {
        self.status.as_ref()
    }

    /// Records the outcome of processing.
    pub(crate) fn record_status(&mut self, status: ScheduleStatus) {
        self.status = Some(status);
    }

    /// Records `status` unless one is already present.
    pub(crate) fn record_default_status(&mut self, status: ScheduleStatus) {
        self.status.get_or_insert(status);
    }
}
