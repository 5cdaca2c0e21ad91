//! Scheduling engine: delivery policy, notification composition, tokens.
//!
//! This crate decides, for every scheduling message produced by a change to a
//! shared calendar event, whether a notification must be mailed and in what
//! form:
//! - Delivery policy and status codes ([`SchedulingEngine`], [`ScheduleStatus`])
//! - Recurrence-aware "when" strings and next-occurrence previews
//! - Change highlighting between two versions of an event
//! - Single-use invitation tokens behind accept/decline links
//!
//! Wire parsing, SMTP and token storage stay outside; they are reached
//! through [`SnapshotDecoder`], [`MailTransport`] and [`TokenStore`].
//!
//! # Example
//!
//! ```rust,no_run
//! use imip_scheduler::{
//!     ChangeContext, InvitationToken, JsonSnapshotDecoder, MailTransport, Method, Notification,
//!     SchedulerConfig, SchedulerResult, SchedulingEngine, SchedulingMessage, TokenStore,
//! };
//! use imip_core::{EventSnapshot, EventTime, Participant};
//!
//! struct Outbox;
//!
//! impl MailTransport for Outbox {
//!     fn validate_address(&self, address: &str) -> bool {
//!         address.contains('@')
//!     }
//!
//!     fn send(&self, notification: &Notification) -> SchedulerResult<Vec<String>> {
//!         println!("{}", notification.text_body());
//!         Ok(Vec::new())
//!     }
//! }
//!
//! struct Tokens;
//!
//! impl TokenStore for Tokens {
//!     fn insert(&self, _token: &InvitationToken) -> SchedulerResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SchedulerConfig::load_from("scheduler.toml")?;
//!     let engine = SchedulingEngine::new(config, Outbox, Tokens, JsonSnapshotDecoder);
//!
//!     let start = EventTime::local(chrono_tz::Europe::Paris, 2030, 5, 6, 9, 30).ok_or("bad time")?;
//!     let event = EventSnapshot::new("standup", start)
//!         .with_title("Standup")
//!         .with_participant(Participant::new("mailto:bob@example.com"));
//!     let mut message = SchedulingMessage::new(
//!         Method::Request,
//!         "mailto:alice@example.com",
//!         "mailto:bob@example.com",
//!         event,
//!     );
//!
//!     engine.schedule(&ChangeContext::new(), &mut message);
//!     if let Some(status) = message.status() {
//!         println!("{status}");
//!     }
//!     Ok(())
//! }
//! ```

mod change;
mod clock;
mod compose;
mod config;
mod describe;
mod diff;
mod engine;
mod error;
mod last_occurrence;
mod lookahead;
mod message;
mod render;
mod status;
#[cfg(test)]
mod testing;
mod token;
mod transport;

pub use change::{ChangeContext, JsonSnapshotDecoder, SnapshotDecoder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use compose::{
    ATTACHMENT_NAME, Attachment, BodyItem, Button, Composer, Mailbox, Notification,
    NotificationKind, ResponseLinks,
};
pub use config::{LinkRecipientPolicy, SchedulerConfig};
pub use describe::{Span, describe_recurrence, describe_when};
pub use diff::{EventDiff, EventDiffer, EventField, FieldChange, FieldDiffer};
pub use engine::SchedulingEngine;
pub use error::{SchedulerError, SchedulerResult};
pub use last_occurrence::{last_occurrence, last_occurrence_of};
pub use lookahead::{Lookahead, Upcoming};
pub use message::{Method, SchedulingMessage};
pub use render::{EventBody, RenderContext, RenderedField};
pub use status::{DELIVERY_FAILED, NOT_SIGNIFICANT, SCHEDULING_DISABLED, ScheduleStatus};
pub use token::{
    InvitationToken, SecureRandom, TOKEN_ALPHABET, TOKEN_LENGTH, ThreadRandom, TokenIssuer,
    TokenStore,
};
pub use transport::MailTransport;
