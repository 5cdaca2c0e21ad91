//! Scheduling status codes.
//!
//! Internally the outcome is a tagged value; the wire text is produced only
//! by [`Display`](std::fmt::Display) and is byte-for-byte the protocol form:
//!
//! | variant | wire text |
//! |---|---|
//! | `Accepted(r)` | `1.0;r` |
//! | `Delivered` | `1.1; Scheduling message is sent via iMip` |
//! | `PermanentFailure(r)` | `5.0; r` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Reason attached to silent accepts.
pub const NOT_SIGNIFICANT: &str =
    "We got the message, but it's not significant enough to warrant an email";

/// Reason attached when the organizer turned scheduling off for the event.
pub const SCHEDULING_DISABLED: &str =
    "We got the message, but iMip messages are disabled for this event";

/// Reason attached to delivery failures.
pub const DELIVERY_FAILED: &str = "EMail delivery failed";

const DELIVERED_TEXT: &str = "1.1; Scheduling message is sent via iMip";

/// Outcome of processing one scheduling message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ScheduleStatus {
    /// Accepted but no mail was sent.
    Accepted(String),
    /// A notification was handed to the transport.
    Delivered,
    /// Delivery failed and must not be retried here.
    PermanentFailure(String),
}

impl ScheduleStatus {
    /// Silent accept for changes not worth a mail.
    pub fn not_significant() -> Self {
        Self::Accepted(NOT_SIGNIFICANT.to_string())
    }

    /// Silent accept for events with scheduling turned off.
    pub fn scheduling_disabled() -> Self {
        Self::Accepted(SCHEDULING_DISABLED.to_string())
    }

    /// Failure for undeliverable messages.
    pub fn delivery_failed() -> Self {
        Self::PermanentFailure(DELIVERY_FAILED.to_string())
    }

    /// Returns the numeric request status code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "1.0",
            Self::Delivered => "1.1",
            Self::PermanentFailure(_) => "5.0",
        }
    }

    /// Returns `true` for the delivered status.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(reason) => write!(f, "1.0;{reason}"),
            Self::Delivered => f.write_str(DELIVERED_TEXT),
            Self::PermanentFailure(reason) => write!(f, "5.0; {reason}"),
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, reason) = s
            .split_once(';')
            .ok_or_else(|| SchedulerError::decode(format!("status without code: {s}")))?;
        match code.trim() {
            "1.0" => Ok(Self::Accepted(reason.to_string())),
            "1.1" => Ok(Self::Delivered),
            "5.0" => Ok(Self::PermanentFailure(reason.trim_start().to_string())),
            other => Err(SchedulerError::decode(format!("unknown status code {other}"))),
        }
    }
}

impl From<ScheduleStatus> for String {
    fn from(status: ScheduleStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for ScheduleStatus {
    type Error = SchedulerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
