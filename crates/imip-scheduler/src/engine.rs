//! The scheduling engine.
//!
//! [`SchedulingEngine::schedule`] walks one scheduling message through the
//! delivery policy. The first matching rule decides the outcome:
//!
//! 1. scheduling disabled on the event: silent accept
//! 2. change not significant: silent accept
//! 3. sender or recipient is not a `mailto:` address: not ours, untouched
//! 4. event already over: untouched
//! 5. recipient address rejected by the transport: permanent failure
//! 6. a previous version exists but nothing user-visible changed: silent accept
//! 7. recipient (or, for replies, sender) is not a participant: permanent failure
//! 8. that participant is a room or resource: silent accept
//! 9. otherwise a notification is composed, response links are added when
//!    allowed, and the result of delivery is recorded.
//!
//! The engine never returns an error; every failure ends up in the message's
//! status and in the logs.

use imip_core::{
    EnglishTranslator, EventSnapshot, Locale, Occurrences, Participant, Translator, strip_mailto,
};
use tracing::{debug, error, info, warn};

use crate::change::{ChangeContext, SnapshotDecoder};
use crate::clock::{Clock, SystemClock};
use crate::compose::{Composer, Notification, NotificationKind};
use crate::config::SchedulerConfig;
use crate::diff::{EventDiff, EventDiffer, FieldDiffer};
use crate::last_occurrence::{last_occurrence, last_occurrence_of};
use crate::message::{Method, SchedulingMessage};
use crate::render::RenderContext;
use crate::status::ScheduleStatus;
use crate::token::{SecureRandom, ThreadRandom, TokenIssuer, TokenStore};
use crate::transport::MailTransport;

/// What to do with the message's status.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    /// Leave the status alone.
    Untouched,
    /// Set the status unless one is already present.
    Default(ScheduleStatus),
    /// Set the status.
    Record(ScheduleStatus),
}

/// Decides, composes and sends scheduling notifications.
pub struct SchedulingEngine {
    config: SchedulerConfig,
    transport: Box<dyn MailTransport>,
    tokens: Box<dyn TokenStore>,
    decoder: Box<dyn SnapshotDecoder>,
    clock: Box<dyn Clock>,
    translator: Box<dyn Translator>,
    differ: Box<dyn EventDiffer>,
    random: Box<dyn SecureRandom>,
}

impl SchedulingEngine {
    /// Creates an engine with the system clock, English text, the field
    /// differ and the thread-local random source.
    pub fn new(
        config: SchedulerConfig,
        transport: impl MailTransport + 'static,
        tokens: impl TokenStore + 'static,
        decoder: impl SnapshotDecoder + 'static,
    ) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            tokens: Box::new(tokens),
            decoder: Box::new(decoder),
            clock: Box::new(SystemClock),
            translator: Box::new(EnglishTranslator),
            differ: Box::new(FieldDiffer),
            random: Box::new(ThreadRandom),
        }
    }

    /// Builder: replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Builder: replace the translator.
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Builder: replace the diff primitive.
    pub fn with_differ(mut self, differ: impl EventDiffer + 'static) -> Self {
        self.differ = Box::new(differ);
        self
    }

    /// Builder: replace the random source used for tokens.
    pub fn with_random(mut self, random: impl SecureRandom + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Starts a change, before the stored object is overwritten.
    ///
    /// `previous` holds the stored bytes of the object; pass an empty slice
    /// when the object is new. Bytes that cannot be decoded are logged and
    /// treated as "no previous version".
    pub fn begin_change(&self, previous: &[u8]) -> ChangeContext {
        if previous.is_empty() {
            return ChangeContext::new();
        }
        match self.decoder.decode(previous) {
            Ok(events) => {
                debug!(events = events.len(), "Captured previous calendar object");
                ChangeContext::with_previous(events)
            }
            Err(e) => {
                warn!(error = %e, "Cannot decode previous calendar object, diffing disabled");
                ChangeContext::new()
            }
        }
    }

    /// Processes one scheduling message.
    ///
    /// Records at most one status on `message`; a status set upstream is only
    /// replaced on paths that deliver or fail.
    pub fn schedule(&self, change: &ChangeContext, message: &mut SchedulingMessage) {
        match self.decide(change, message) {
            Outcome::Untouched => {}
            Outcome::Default(status) => message.record_default_status(status),
            Outcome::Record(status) => message.record_status(status),
        }
    }

    fn decide(&self, change: &ChangeContext, message: &SchedulingMessage) -> Outcome {
        let event = &message.event;

        if event.scheduling_disabled {
            debug!(uid = %event.uid, "Scheduling disabled for event");
            return Outcome::Default(ScheduleStatus::scheduling_disabled());
        }
        if !message.significant_change {
            debug!(uid = %event.uid, "Change is not significant");
            return Outcome::Default(ScheduleStatus::not_significant());
        }

        let (Some(sender), Some(recipient)) =
            (mail_address(&message.sender), mail_address(&message.recipient))
        else {
            debug!(
                sender = %message.sender,
                recipient = %message.recipient,
                "Not a mail address, ignoring"
            );
            return Outcome::Untouched;
        };

        let now = self.clock.now();
        let occurrences = self.expand(event);
        let ceiling = self.config.ceiling();
        let last = match &occurrences {
            Some(occurrences) => last_occurrence_of(event, occurrences, ceiling),
            None if event.is_recurring() => ceiling,
            None => last_occurrence(event, ceiling),
        };
        if last < now {
            debug!(uid = %event.uid, last = %last, "Event already concluded");
            return Outcome::Untouched;
        }

        if !self.transport.validate_address(recipient) {
            warn!(recipient = %recipient, "Invalid recipient address");
            return Outcome::Record(ScheduleStatus::delivery_failed());
        }

        let previous = change.previous_for(&event.uid, event.recurrence_id.as_deref());
        let diff = previous
            .map(|old| self.differ.diff(event, old))
            .unwrap_or_default();
        if previous.is_some() && diff.is_empty() {
            warn!(uid = %event.uid, "Significant change without modified fields");
            return Outcome::Record(ScheduleStatus::not_significant());
        }

        let lookup = match message.method {
            Method::Reply => &message.sender,
            _ => &message.recipient,
        };
        let Some(participant) = event.participant(lookup) else {
            warn!(uid = %event.uid, address = %lookup, "Could not find participant");
            return Outcome::Record(ScheduleStatus::delivery_failed());
        };
        if participant.is_room_or_resource() {
            debug!(recipient = %recipient, "Rooms and resources do not receive mail");
            return Outcome::Record(ScheduleStatus::not_significant());
        }

        let sender_name = message
            .sender_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(change.acting_user())
            .unwrap_or_default();

        let locale = Locale::new(self.translator.as_ref(), participant.language.as_deref());
        let mut notification = self.compose(
            &locale,
            message,
            participant,
            previous,
            &diff,
            occurrences.as_ref(),
            sender_name,
        );

        if message.method == Method::Request && participant.expects_response() {
            if self.config.invitation_link_recipients.permits(recipient) {
                let issuer = TokenIssuer::new(self.random.as_ref(), self.tokens.as_ref());
                match issuer.issue(message, last) {
                    Ok(token) => {
                        notification.response =
                            Some(Composer::new(&self.config, &locale).response_links(&token.token));
                    }
                    Err(e) => {
                        error!(uid = %event.uid, error = %e, "Failed to store invitation token");
                    }
                }
            } else {
                debug!(recipient = %recipient, "Response links not allowed for recipient");
            }
        }

        self.deliver(sender, recipient, &notification)
    }

    fn expand(&self, event: &EventSnapshot) -> Option<Occurrences> {
        let rule = event.recurrence.as_ref()?;
        match rule.expand(&event.uid, &event.start) {
            Ok(occurrences) => Some(occurrences),
            Err(e) => {
                warn!(uid = %event.uid, error = %e, "Cannot expand recurrence");
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn compose(
        &self,
        locale: &Locale<'_>,
        message: &SchedulingMessage,
        participant: &Participant,
        previous: Option<&EventSnapshot>,
        diff: &EventDiff,
        occurrences: Option<&Occurrences>,
        sender_name: &str,
    ) -> Notification {
        let event = &message.event;
        let render = RenderContext {
            locale,
            now: self.clock.now(),
        };
        let (kind, body) = match message.method {
            Method::Reply => (
                NotificationKind::Reply(participant.partstat),
                render.render_body(event, None, &EventDiff::default(), occurrences),
            ),
            Method::Cancel => (
                NotificationKind::Cancellation,
                render.render_cancelled_body(event, occurrences),
            ),
            Method::Request | Method::Other(_) => (
                if previous.is_some() {
                    NotificationKind::Update
                } else {
                    NotificationKind::Invitation
                },
                render.render_body(event, previous, diff, occurrences),
            ),
        };
        Composer::new(&self.config, locale).compose(kind, message, sender_name, &body)
    }

    fn deliver(&self, sender: &str, recipient: &str, notification: &Notification) -> Outcome {
        match self.transport.send(notification) {
            Ok(failed) if failed.is_empty() => {
                info!(
                    sender = %sender,
                    recipient = %recipient,
                    subject = %notification.subject,
                    "Scheduling notification sent"
                );
                Outcome::Record(ScheduleStatus::Delivered)
            }
            Ok(failed) => {
                error!(recipient = %recipient, failed = ?failed, "Unable to deliver message");
                Outcome::Record(ScheduleStatus::delivery_failed())
            }
            Err(e) => {
                error!(recipient = %recipient, error = %e, "Mail transport failed");
                Outcome::Record(ScheduleStatus::delivery_failed())
            }
        }
    }
}

/// Returns the e-mail address of a `mailto:` URI.
fn mail_address(uri: &str) -> Option<&str> {
    let address = strip_mailto(uri);
    (address.len() < uri.len() && !address.is_empty()).then_some(address)
}
