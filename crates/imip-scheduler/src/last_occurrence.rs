//! Resolves when an event is guaranteed to be over.
//!
//! The result filters stale notifications and stamps token expiry, so both
//! callers must see the same value for the same event.

use chrono::{DateTime, Utc};
use imip_core::{EventSnapshot, Occurrences};
use tracing::warn;

/// Returns the instant `event` has concluded by.
///
/// Open-ended series resolve to `ceiling`. Bounded series resolve to the end
/// of their last occurrence starting before `ceiling`, clamped to it. A rule
/// that cannot be expanded is treated as open-ended.
pub fn last_occurrence(event: &EventSnapshot, ceiling: DateTime<Utc>) -> DateTime<Utc> {
    let Some(rule) = &event.recurrence else {
        return event.effective_end().to_utc_datetime();
    };
    if rule.is_unbounded() {
        return ceiling;
    }
    match rule.expand(&event.uid, &event.start) {
        Ok(occurrences) => bounded_end(event, &occurrences, ceiling),
        Err(e) => {
            warn!(uid = %event.uid, error = %e, "Cannot expand recurrence, using ceiling");
            ceiling
        }
    }
}

/// Same as [`last_occurrence`] for an already expanded series.
pub fn last_occurrence_of(
    event: &EventSnapshot,
    occurrences: &Occurrences,
    ceiling: DateTime<Utc>,
) -> DateTime<Utc> {
    match &event.recurrence {
        None => event.effective_end().to_utc_datetime(),
        Some(rule) if rule.is_unbounded() => ceiling,
        Some(_) => bounded_end(event, occurrences, ceiling),
    }
}

fn bounded_end(
    event: &EventSnapshot,
    occurrences: &Occurrences,
    ceiling: DateTime<Utc>,
) -> DateTime<Utc> {
    let start = event.start.to_utc_datetime();
    let length = event.effective_end().to_utc_datetime() - start;
    match occurrences.iter().take_while(|d| *d < ceiling).last() {
        Some(last) => last
            .checked_add_signed(length)
            .map_or(ceiling, |end| end.min(ceiling)),
        None => event.effective_end().to_utc_datetime().min(ceiling),
    }
}
