//! Field-level comparison of two versions of an event.

use imip_core::EventSnapshot;

/// A user-visible aspect of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Title,
    Description,
    Location,
    Url,
    /// Start, end, duration or recurrence.
    When,
    /// Organizer or attendee list.
    Participants,
}

/// One changed field with its values before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: EventField,
    pub old: String,
    pub new: String,
}

/// Result of comparing two versions of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDiff {
    pub changes: Vec<FieldChange>,
}

impl EventDiff {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns `true` if `field` changed.
    pub fn is_changed(&self, field: EventField) -> bool {
        self.changes.iter().any(|c| c.field == field)
    }

    /// Returns the change of `field`, if any.
    pub fn change(&self, field: EventField) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.field == field)
    }
}

/// Diff primitive between a new and an old version of one event.
pub trait EventDiffer: Send + Sync {
    fn diff(&self, new: &EventSnapshot, old: &EventSnapshot) -> EventDiff;
}

/// Compares fields by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDiffer;

impl EventDiffer for FieldDiffer {
    fn diff(&self, new: &EventSnapshot, old: &EventSnapshot) -> EventDiff {
        let mut changes = Vec::new();
        let mut text = |field: EventField, old: &str, new: &str| {
            if old != new {
                changes.push(FieldChange {
                    field,
                    old: old.to_string(),
                    new: new.to_string(),
                });
            }
        };
        text(EventField::Title, &old.title, &new.title);
        text(EventField::Description, &old.description, &new.description);
        text(EventField::Location, &old.location, &new.location);
        text(EventField::Url, &old.url, &new.url);
        text(EventField::When, &timing(old), &timing(new));
        text(EventField::Participants, &people(old), &people(new));
        EventDiff { changes }
    }
}

fn timing(event: &EventSnapshot) -> String {
    format!(
        "{:?}/{:?}/{:?}",
        event.start,
        event.effective_end(),
        event.recurrence
    )
}

fn people(event: &EventSnapshot) -> String {
    let mut entries: Vec<String> = event
        .organizer
        .iter()
        .chain(&event.participants)
        .map(|p| {
            format!(
                "{}:{:?}:{:?}:{:?}",
                p.address.to_lowercase(),
                p.role,
                p.partstat,
                p.cutype
            )
        })
        .collect();
    entries.sort();
    entries.join(",")
}
