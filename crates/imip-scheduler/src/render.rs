//! Event body rendering.
//!
//! Every user-visible field is rendered twice: as plain text and as HTML.
//! When a previous version exists, HTML of changed fields shows the old value
//! struck through followed by the new one. Web addresses in the location and
//! link fields become hyperlinks whether or not they changed.

use chrono::{DateTime, Utc};
use imip_core::{EventSnapshot, Locale, Occurrences, html_escape, linkify, strike, strike_through};

use crate::describe::describe_when;
use crate::diff::{EventDiff, EventField};
use crate::lookahead::Lookahead;

/// One field in both renderings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedField {
    pub text: String,
    pub html: String,
}

impl RenderedField {
    /// Returns `true` when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The rendered fields of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBody {
    pub title: RenderedField,
    pub when: RenderedField,
    pub location: RenderedField,
    pub url: RenderedField,
    pub description: RenderedField,
    /// Next occurrences of a recurring event.
    pub occurring: Option<RenderedField>,
}

/// Inputs shared by every field of one rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub locale: &'a Locale<'a>,
    pub now: DateTime<Utc>,
}

impl RenderContext<'_> {
    fn title(&self, event: &EventSnapshot) -> String {
        if event.title.trim().is_empty() {
            self.locale.t("Untitled event", &[])
        } else {
            event.title.clone()
        }
    }

    fn when(&self, event: &EventSnapshot, occurrences: Option<&Occurrences>) -> String {
        match occurrences {
            Some(occurrences) => describe_when(self.locale, event, Some(occurrences), self.now),
            None => {
                let expanded = event
                    .recurrence
                    .as_ref()
                    .and_then(|rule| rule.expand(&event.uid, &event.start).ok());
                describe_when(self.locale, event, expanded.as_ref(), self.now)
            }
        }
    }

    /// Renders an invitation, update or reply body.
    ///
    /// `occurrences` is the expansion of `event`'s recurrence, if any. With
    /// no `previous` version every field is rendered plain.
    pub fn render_body(
        &self,
        event: &EventSnapshot,
        previous: Option<&EventSnapshot>,
        diff: &EventDiff,
        occurrences: Option<&Occurrences>,
    ) -> EventBody {
        let changed = |field: EventField| previous.filter(|_| diff.is_changed(field));

        let title = self.title(event);
        let title = RenderedField {
            html: match changed(EventField::Title) {
                Some(old) => strike_through(&html_escape(&self.title(old)), &html_escape(&title)),
                None => html_escape(&title),
            },
            text: title,
        };

        let when = self.when(event, occurrences);
        let when = RenderedField {
            html: match changed(EventField::When) {
                Some(old) => strike_through(&html_escape(&self.when(old, None)), &html_escape(&when)),
                None => html_escape(&when),
            },
            text: when,
        };

        let location = field(
            &event.location,
            changed(EventField::Location).map(|old| old.location.as_str()),
            linkify,
        );
        let url = field(
            &event.url,
            changed(EventField::Url).map(|old| old.url.as_str()),
            linkify,
        );
        let description = field(
            &event.description,
            changed(EventField::Description).map(|old| old.description.as_str()),
            html_escape,
        );

        let occurring = occurrences
            .and_then(|occurrences| Lookahead::from_now(occurrences, self.now))
            .map(|lookahead| {
                let text = lookahead.describe(self.locale, event.start.zone());
                RenderedField {
                    html: html_escape(&text),
                    text,
                }
            });

        EventBody {
            title,
            when,
            location,
            url,
            description,
            occurring,
        }
    }

    /// Renders a cancellation: every field struck through.
    pub fn render_cancelled_body(
        &self,
        event: &EventSnapshot,
        occurrences: Option<&Occurrences>,
    ) -> EventBody {
        let struck = |text: String| RenderedField {
            html: if text.is_empty() {
                String::new()
            } else {
                strike(&html_escape(&text))
            },
            text,
        };
        EventBody {
            title: struck(self.title(event)),
            when: struck(self.when(event, occurrences)),
            location: struck(event.location.clone()),
            url: struck(event.url.clone()),
            description: struck(event.description.clone()),
            occurring: None,
        }
    }
}

fn field(new: &str, old: Option<&str>, to_html: fn(&str) -> String) -> RenderedField {
    let html = match old {
        Some(old) => strike_through(&to_html(old), &to_html(new)),
        None => to_html(new),
    };
    RenderedField {
        text: new.to_string(),
        html,
    }
}
