//! Notification composition.
//!
//! Turns a rendered event body into a transport-neutral [`Notification`]:
//! envelope, subject, heading, labelled bullet items (each with a plain-text
//! and an HTML rendering), optional response links and the inline calendar
//! attachment. Turning that into an actual e-mail is the transport's job.


use std::fmt;

use imip_core::{EventSnapshot, Locale, Participant, ParticipationStatus, html_escape, strip_mailto};
use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::message::SchedulingMessage;
use crate::render::{EventBody, RenderedField};

/// File name of the calendar attachment.
pub const ATTACHMENT_NAME: &str = "event.ics";

/// An address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub address: String,
    pub name: Option<String>,
}

impl Mailbox {
    /// Creates a mailbox; blank names are dropped.
    pub fn new(address: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            address: address.into(),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// One labelled line of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyItem {
    pub label: String,
    pub text: String,
    pub html: String,
}

/// A labelled link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub url: String,
}

/// Accept/decline buttons plus the "more options" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseLinks {
    pub accept: Button,
    pub decline: Button,
    pub more_options_html: String,
    pub more_options_text: String,
}

/// Inline calendar attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

/// Which wording a notification uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Invitation,
    Update,
    /// A reply carrying the replying attendee's status.
    Reply(ParticipationStatus),
    Cancellation,
}

/// A composed notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Mailbox,
    pub subject: String,
    pub heading: String,
    pub items: Vec<BodyItem>,
    pub response: Option<ResponseLinks>,
    pub attachment: Attachment,
}

impl Notification {
    /// Renders the plain-text body.
    pub fn text_body(&self) -> String {
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} {}", item.label, item.text))
            .collect();
        let mut body = format!("{}\n\n{}", self.heading, imip_core::bulletize(&items));
        if let Some(links) = &self.response {
            body.push_str(&format!(
                "\n\n{}: {}\n{}: {}\n{}",
                links.accept.label,
                links.accept.url,
                links.decline.label,
                links.decline.url,
                links.more_options_text
            ));
        }
        body
    }
}

/// Builds notifications in one recipient's language.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    config: &'a SchedulerConfig,
    locale: &'a Locale<'a>,
}

impl<'a> Composer<'a> {
    pub fn new(config: &'a SchedulerConfig, locale: &'a Locale<'a>) -> Self {
        Self { config, locale }
    }

    /// Composes the notification for `message`.
    ///
    /// `sender_name` is the resolved display name of the sender, possibly
    /// empty.
    pub fn compose(
        &self,
        kind: NotificationKind,
        message: &SchedulingMessage,
        sender_name: &str,
        body: &EventBody,
    ) -> Notification {
        let l = self.locale;
        let title = body.title.text.as_str();
        let sender = if sender_name.is_empty() {
            strip_mailto(&message.sender)
        } else {
            sender_name
        };

        let (subject, heading) = match kind {
            NotificationKind::Invitation => (
                l.t("Invitation: %1$s", &[title]),
                l.t("%1$s would like to invite you to \"%2$s\"", &[sender, title]),
            ),
            NotificationKind::Update => (
                l.t("Invitation updated: %1$s", &[title]),
                l.t("%1$s has updated the event \"%2$s\"", &[sender, title]),
            ),
            NotificationKind::Cancellation => (
                l.t("Cancelled: %1$s", &[title]),
                l.t("\"%1$s\" has been canceled", &[title]),
            ),
            NotificationKind::Reply(status) => (
                l.t("Re: %1$s", &[title]),
                match status {
                    ParticipationStatus::Accepted => {
                        l.t("%1$s has accepted your invitation", &[sender])
                    }
                    ParticipationStatus::Tentative => {
                        l.t("%1$s has tentatively accepted your invitation", &[sender])
                    }
                    ParticipationStatus::Declined => {
                        l.t("%1$s has declined your invitation", &[sender])
                    }
                    _ => l.t("%1$s has responded to your invitation", &[sender]),
                },
            ),
        };

        let from_name = if sender_name.is_empty() {
            self.config.instance_name.clone()
        } else {
            l.t("%1$s via %2$s", &[sender_name, &self.config.instance_name])
        };

        Notification {
            kind,
            from: Mailbox::new(&self.config.from_address, Some(from_name.as_str())),
            to: Mailbox::new(
                strip_mailto(&message.recipient),
                message.recipient_name.as_deref(),
            ),
            reply_to: Mailbox::new(strip_mailto(&message.sender), Some(sender_name)),
            subject,
            heading,
            items: self.items(&message.event, body),
            response: None,
            attachment: Attachment {
                file_name: ATTACHMENT_NAME.to_string(),
                content_type: format!("text/calendar; method={}", message.method),
                content: message.payload.clone(),
            },
        }
    }

    fn items(&self, event: &EventSnapshot, body: &EventBody) -> Vec<BodyItem> {
        let l = self.locale;
        let mut items = Vec::new();
        let mut push = |label: &str, field: &RenderedField| {
            if !field.is_empty() {
                items.push(BodyItem {
                    label: l.t(label, &[]),
                    text: field.text.clone(),
                    html: field.html.clone(),
                });
            }
        };

        push("Title:", &body.title);
        push("When:", &body.when);
        push("Location:", &body.location);
        push("Link:", &body.url);
        if let Some(occurring) = &body.occurring {
            push("Occurring:", occurring);
        }
        if self.config.list_attendees {
            if let Some(organizer) = &event.organizer {
                push("Organizer:", &people(std::slice::from_ref(organizer)));
            }
            push("Attendees:", &people(&event.participants));
        }
        push("Description:", &body.description);
        items
    }

    /// Builds the response links for `token`.
    pub fn response_links(&self, token: &str) -> ResponseLinks {
        let l = self.locale;
        let more_options = self.config.response_url("moreOptions", token);
        ResponseLinks {
            accept: Button {
                label: l.t("Accept", &[]),
                url: self.config.response_url("accept", token),
            },
            decline: Button {
                label: l.t("Decline", &[]),
                url: self.config.response_url("decline", token),
            },
            more_options_html: format!(
                "<small><a href=\"{}\">{}</a></small>",
                html_escape(&more_options),
                html_escape(&l.t("More options …", &[]))
            ),
            more_options_text: l.t("More options at %1$s", &[&more_options]),
        }
    }
}

/// Lists participants as `Name <email>`, marking those who accepted.
fn people(participants: &[Participant]) -> RenderedField {
    let lines: Vec<String> = participants
        .iter()
        .map(|p| {
            let mailbox = Mailbox::new(p.email(), p.name());
            match p.partstat {
                ParticipationStatus::Accepted => format!("{mailbox} ✔︎"),
                _ => mailbox.to_string(),
            }
        })
        .collect();
    RenderedField {
        html: lines
            .iter()
            .map(|line| html_escape(line))
            .collect::<Vec<_>>()
            .join("<br/>"),
        text: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Method;
    use chrono::NaiveDate;
    use imip_core::{EnglishTranslator, EventTime};

    fn message(method: Method) -> SchedulingMessage {
        let start = EventTime::from_date(NaiveDate::from_ymd_opt(2024, 7, 8).unwrap());
        SchedulingMessage::new(
            method,
            "mailto:alice@example.com",
            "mailto:bob@example.com",
            EventSnapshot::new("uid", start)
                .with_organizer(Participant::new("mailto:alice@example.com").with_name("Alice"))
                .with_participant(
                    Participant::new("mailto:bob@example.com")
                        .with_name("Bob")
                        .with_partstat(ParticipationStatus::Accepted),
                )
                .with_participant(Participant::new("mailto:carol@example.com")),
        )
        .with_recipient_name("Bob")
        .with_payload("BEGIN:VCALENDAR")
    }

    fn body() -> EventBody {
        let plain = |s: &str| RenderedField {
            text: s.to_string(),
            html: s.to_string(),
        };
        EventBody {
            title: plain("Planning"),
            when: plain("Every Day for the entire day"),
            description: plain("Agenda"),
            occurring: Some(plain("In 1 day on July 8, 2024")),
            ..Default::default()
        }
    }

    fn compose(config: &SchedulerConfig, kind: NotificationKind, sender_name: &str) -> Notification {
        let locale = Locale::new(&EnglishTranslator, None);
        Composer::new(config, &locale).compose(kind, &message(Method::Request), sender_name, &body())
    }

    mod envelope {
        use super::*;

        #[test]
        fn from_uses_sender_via_instance() {
            let n = compose(&SchedulerConfig::default(), NotificationKind::Invitation, "Alice");
            assert_eq!(n.from.to_string(), "Alice via Calendar <invitations-noreply@localhost>");
            assert_eq!(n.to.to_string(), "Bob <bob@example.com>");
            assert_eq!(n.reply_to.to_string(), "Alice <alice@example.com>");
        }

        #[test]
        fn from_falls_back_to_instance_name() {
            let n = compose(&SchedulerConfig::default(), NotificationKind::Invitation, "");
            assert_eq!(n.from.to_string(), "Calendar <invitations-noreply@localhost>");
            assert_eq!(n.reply_to.to_string(), "alice@example.com");
            assert_eq!(
                n.heading,
                "alice@example.com would like to invite you to \"Planning\""
            );
        }

        #[test]
        fn attachment_carries_payload() {
            let n = compose(&SchedulerConfig::default(), NotificationKind::Invitation, "Alice");
            assert_eq!(n.attachment.file_name, "event.ics");
            assert_eq!(n.attachment.content_type, "text/calendar; method=REQUEST");
            assert_eq!(n.attachment.content, "BEGIN:VCALENDAR");
        }
    }

    mod wording {
        use super::*;

        #[test]
        fn subjects_and_headings() {
            let config = SchedulerConfig::default();
            let cases = [
                (
                    NotificationKind::Invitation,
                    "Invitation: Planning",
                    "Alice would like to invite you to \"Planning\"",
                ),
                (
                    NotificationKind::Update,
                    "Invitation updated: Planning",
                    "Alice has updated the event \"Planning\"",
                ),
                (
                    NotificationKind::Cancellation,
                    "Cancelled: Planning",
                    "\"Planning\" has been canceled",
                ),
                (
                    NotificationKind::Reply(ParticipationStatus::Accepted),
                    "Re: Planning",
                    "Alice has accepted your invitation",
                ),
                (
                    NotificationKind::Reply(ParticipationStatus::Tentative),
                    "Re: Planning",
                    "Alice has tentatively accepted your invitation",
                ),
                (
                    NotificationKind::Reply(ParticipationStatus::Declined),
                    "Re: Planning",
                    "Alice has declined your invitation",
                ),
                (
                    NotificationKind::Reply(ParticipationStatus::NeedsAction),
                    "Re: Planning",
                    "Alice has responded to your invitation",
                ),
            ];
            for (kind, subject, heading) in cases {
                let n = compose(&config, kind, "Alice");
                assert_eq!(n.subject, subject);
                assert_eq!(n.heading, heading);
            }
        }
    }

    mod items {
        use super::*;

        fn labels(n: &Notification) -> Vec<&str> {
            n.items.iter().map(|i| i.label.as_str()).collect()
        }

        #[test]
        fn empty_fields_are_omitted_and_description_is_last() {
            let n = compose(&SchedulerConfig::default(), NotificationKind::Invitation, "Alice");
            assert_eq!(
                labels(&n),
                vec!["Title:", "When:", "Occurring:", "Description:"]
            );
        }

        #[test]
        fn attendees_when_enabled() {
            let config = SchedulerConfig::default().with_list_attendees(true);
            let n = compose(&config, NotificationKind::Invitation, "Alice");
            assert_eq!(
                labels(&n),
                vec!["Title:", "When:", "Occurring:", "Organizer:", "Attendees:", "Description:"]
            );
            let attendees = &n.items[4];
            assert_eq!(attendees.text, "Bob <bob@example.com> ✔︎\ncarol@example.com");
            assert_eq!(
                attendees.html,
                "Bob &lt;bob@example.com&gt; ✔︎<br/>carol@example.com"
            );
            assert_eq!(n.items[3].text, "Alice <alice@example.com>");
        }
    }

    mod links {
        use super::*;

        #[test]
        fn response_links_use_base_url() {
            let config = SchedulerConfig::default().with_base_url("https://cloud.example.com/dav/");
            let locale = Locale::new(&EnglishTranslator, None);
            let links = Composer::new(&config, &locale).response_links("TOKEN");
            assert_eq!(links.accept.label, "Accept");
            assert_eq!(
                links.accept.url,
                "https://cloud.example.com/dav/invitation/accept/TOKEN"
            );
            assert_eq!(
                links.decline.url,
                "https://cloud.example.com/dav/invitation/decline/TOKEN"
            );
            assert_eq!(
                links.more_options_html,
                "<small><a href=\"https://cloud.example.com/dav/invitation/moreOptions/TOKEN\">More options …</a></small>"
            );
            assert_eq!(
                links.more_options_text,
                "More options at https://cloud.example.com/dav/invitation/moreOptions/TOKEN"
            );
        }
    }
}
