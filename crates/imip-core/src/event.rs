//! Event types for scheduling.
//!
//! This module provides the immutable view of one calendar event that the
//! scheduling engine works on:
//! - [`EventSnapshot`]: title, timing, recurrence and people of one event
//! - [`Participant`]: an attendee or organizer with its scheduling parameters
//! - [`Role`], [`CalendarUserType`], [`ParticipationStatus`]: participant parameters

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceRule;
use crate::time::EventTime;

/// Participation role of an attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Role {
    Chair,
    ReqParticipant,
    OptParticipant,
    NonParticipant,
    /// Any experimental or unknown role.
    #[serde(other)]
    Other,
}

/// Kind of calendar user behind an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum CalendarUserType {
    #[default]
    Individual,
    Group,
    Resource,
    Room,
    #[serde(other)]
    Unknown,
}

/// Response status of a participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ParticipationStatus {
    #[default]
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
    #[serde(other)]
    Other,
}

/// An attendee or organizer of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Calendar address, usually a `mailto:` URI.
    pub address: String,
    /// Display name (CN parameter).
    #[serde(default)]
    pub common_name: Option<String>,
    /// Role, `None` when the parameter is absent.
    #[serde(default)]
    pub role: Option<Role>,
    /// RSVP flag, `None` when the parameter is absent.
    #[serde(default)]
    pub rsvp: Option<bool>,
    #[serde(default)]
    pub cutype: CalendarUserType,
    #[serde(default)]
    pub partstat: ParticipationStatus,
    /// Preferred language for messages sent to this participant.
    #[serde(default)]
    pub language: Option<String>,
}

impl Participant {
    /// Creates a participant with default parameters.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            common_name: None,
            role: None,
            rsvp: None,
            cutype: CalendarUserType::default(),
            partstat: ParticipationStatus::default(),
            language: None,
        }
    }

    /// Builder: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    /// Builder: set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Builder: set the RSVP flag.
    pub fn with_rsvp(mut self, rsvp: bool) -> Self {
        self.rsvp = Some(rsvp);
        self
    }

    /// Builder: set the calendar user type.
    pub fn with_cutype(mut self, cutype: CalendarUserType) -> Self {
        self.cutype = cutype;
        self
    }

    /// Builder: set the participation status.
    pub fn with_partstat(mut self, partstat: ParticipationStatus) -> Self {
        self.partstat = partstat;
        self
    }

    /// Builder: set the preferred language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Returns `true` if this participant has `address`, ignoring case.
    pub fn has_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }

    /// Returns the address without its `mailto:` scheme.
    pub fn email(&self) -> &str {
        strip_mailto(&self.address)
    }

    /// Returns the trimmed display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.common_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Rooms and resources are booked, never mailed.
    pub fn is_room_or_resource(&self) -> bool {
        matches!(
            self.cutype,
            CalendarUserType::Room | CalendarUserType::Resource
        )
    }

    /// Returns `true` if the organizer expects an answer from this participant.
    ///
    /// An explicit `RSVP=TRUE` always does. Otherwise an absent role, or a
    /// required or optional participant role, counts as expected even when
    /// `RSVP=FALSE` was set.
    pub fn expects_response(&self) -> bool {
        if self.rsvp == Some(true) {
            return true;
        }
        matches!(
            self.role,
            None | Some(Role::ReqParticipant) | Some(Role::OptParticipant)
        )
    }
}

/// Strips a leading `mailto:` (any case) from a calendar address.
pub fn strip_mailto(address: &str) -> &str {
    match address.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("mailto:") => &address[7..],
        _ => address,
    }
}

/// Immutable state of one calendar event.
///
/// Empty text fields mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    /// Unique identifier shared by all instances of the event.
    pub uid: String,
    /// Identifies an overridden instance of a recurring event.
    #[serde(default)]
    pub recurrence_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    pub start: EventTime,
    #[serde(default)]
    pub end: Option<EventTime>,
    /// Explicit duration, used when there is no end.
    #[serde(default, with = "duration_seconds")]
    pub duration: Option<TimeDelta>,
    /// Present iff the event recurs.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub organizer: Option<Participant>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// The organizer switched off scheduling for this event.
    #[serde(default)]
    pub scheduling_disabled: bool,
}

impl EventSnapshot {
    /// Creates a new snapshot with required fields.
    pub fn new(uid: impl Into<String>, start: EventTime) -> Self {
        Self {
            uid: uid.into(),
            recurrence_id: None,
            title: String::new(),
            description: String::new(),
            location: String::new(),
            url: String::new(),
            start,
            end: None,
            duration: None,
            recurrence: None,
            organizer: None,
            participants: Vec::new(),
            scheduling_disabled: false,
        }
    }

    /// Builder: set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder: set the url.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder: set the end.
    pub fn with_end(mut self, end: EventTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder: set the duration.
    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Builder: set the recurrence rule.
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Builder: set the recurrence id.
    pub fn with_recurrence_id(mut self, recurrence_id: impl Into<String>) -> Self {
        self.recurrence_id = Some(recurrence_id.into());
        self
    }

    /// Builder: set the organizer.
    pub fn with_organizer(mut self, organizer: Participant) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// Builder: add a participant.
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Builder: mark scheduling as disabled.
    pub fn with_scheduling_disabled(mut self, disabled: bool) -> Self {
        self.scheduling_disabled = disabled;
        self
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Returns true if the event recurs.
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Returns the end of the first instance.
    ///
    /// Prefers the explicit end, then start + duration, then one day for
    /// all-day events. A timed event with neither ends when it starts.
    pub fn effective_end(&self) -> EventTime {
        if let Some(end) = self.end {
            return end;
        }
        if let Some(duration) = self.duration {
            return self.start.shifted(duration);
        }
        if self.start.is_all_day() {
            return self.start.shifted(TimeDelta::days(1));
        }
        self.start
    }

    /// Looks up a participant by address, ignoring case.
    pub fn participant(&self, address: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.has_address(address))
    }
}

mod duration_seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Option<TimeDelta>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.num_seconds()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeDelta>, D::Error> {
        Option::<i64>::deserialize(d)?
            .map(|secs| {
                TimeDelta::try_seconds(secs)
                    .ok_or_else(|| D::Error::custom(format!("duration out of range: {secs}s")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> EventTime {
        EventTime::from_utc(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(), chrono_tz::UTC)
    }

    mod participant {
        use super::*;

        #[test]
        fn address_matching_ignores_case() {
            let p = Participant::new("mailto:Bob@Example.com");
            assert!(p.has_address("MAILTO:bob@example.com"));
            assert_eq!(p.email(), "Bob@Example.com");
        }

        #[test]
        fn rooms_and_resources() {
            assert!(
                Participant::new("mailto:r@x")
                    .with_cutype(CalendarUserType::Room)
                    .is_room_or_resource()
            );
            assert!(
                Participant::new("mailto:r@x")
                    .with_cutype(CalendarUserType::Resource)
                    .is_room_or_resource()
            );
            assert!(!Participant::new("mailto:r@x").is_room_or_resource());
        }

        #[test]
        fn expected_to_respond() {
            assert!(Participant::new("mailto:a@x").expects_response());
            assert!(
                Participant::new("mailto:a@x")
                    .with_role(Role::OptParticipant)
                    .with_rsvp(false)
                    .expects_response()
            );
            assert!(
                Participant::new("mailto:a@x")
                    .with_role(Role::Chair)
                    .with_rsvp(true)
                    .expects_response()
            );
            assert!(
                !Participant::new("mailto:a@x")
                    .with_role(Role::NonParticipant)
                    .expects_response()
            );
            assert!(
                !Participant::new("mailto:a@x")
                    .with_role(Role::Chair)
                    .expects_response()
            );
        }

        #[test]
        fn blank_name_is_none() {
            assert_eq!(Participant::new("mailto:a@x").with_name("  ").name(), None);
            assert_eq!(
                Participant::new("mailto:a@x").with_name(" Ann ").name(),
                Some("Ann")
            );
        }

        #[test]
        fn deserialize_parameters() {
            let p: Participant = serde_json::from_str(
                r#"{"address":"mailto:a@x","role":"REQ-PARTICIPANT","cutype":"ROOM","partstat":"X-CUSTOM"}"#,
            )
            .unwrap();
            assert_eq!(p.role, Some(Role::ReqParticipant));
            assert_eq!(p.cutype, CalendarUserType::Room);
            assert_eq!(p.partstat, ParticipationStatus::Other);
        }
    }

    mod effective_end {
        use super::*;

        #[test]
        fn explicit_end_wins() {
            let e = EventSnapshot::new("1", at(2016, 1, 1, 0))
                .with_end(at(2017, 1, 1, 0))
                .with_duration(TimeDelta::hours(1));
            assert_eq!(e.effective_end(), at(2017, 1, 1, 0));
        }

        #[test]
        fn duration_is_added() {
            let e = EventSnapshot::new("1", at(2016, 1, 1, 0)).with_duration(TimeDelta::hours(2));
            assert_eq!(e.effective_end(), at(2016, 1, 1, 2));
        }

        #[test]
        fn all_day_lasts_one_day() {
            let day = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
            let e = EventSnapshot::new("1", EventTime::from_date(day));
            assert_eq!(
                e.effective_end(),
                EventTime::from_date(NaiveDate::from_ymd_opt(2016, 1, 2).unwrap())
            );
        }

        #[test]
        fn timed_without_end_ends_at_start() {
            let e = EventSnapshot::new("1", at(2016, 1, 1, 0));
            assert_eq!(e.effective_end(), at(2016, 1, 1, 0));
        }
    }

    #[test]
    fn serde_roundtrip_keeps_duration() {
        let e = EventSnapshot::new("uid-1", at(2024, 1, 1, 9))
            .with_title("Standup")
            .with_duration(TimeDelta::minutes(15))
            .with_participant(Participant::new("mailto:a@x").with_rsvp(true));
        let json = serde_json::to_string(&e).unwrap();
        let back: EventSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn out_of_range_duration_is_rejected() {
        let e = EventSnapshot::new("uid-1", at(2024, 1, 1, 9));
        let mut json = serde_json::to_value(&e).unwrap();
        json["duration"] = serde_json::json!(100_000_000_000_000_000_i64);
        let err = serde_json::from_value::<EventSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("duration out of range"));
    }

    #[test]
    fn huge_duration_saturates_end() {
        let e = EventSnapshot::new("uid-1", at(2024, 1, 1, 9))
            .with_duration(TimeDelta::seconds(10_000_000_000_000));
        assert_eq!(e.effective_end().to_utc_datetime(), chrono::DateTime::<Utc>::MAX_UTC);
    }
}
