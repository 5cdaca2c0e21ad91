//! Time types for scheduled events.
//!
//! This module provides [`EventTime`] for representing event start/end times
//! (either a zoned instant or an all-day date), [`CalendarSpan`] for calendar
//! differences between two instants, and [`TimeDistance`], the bucketed
//! "how far away is this" value used when describing upcoming occurrences.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Represents the start or end of a calendar event.
///
/// Calendar events can have two types of times:
/// - **DateTime**: A specific instant together with the zone it was authored in
/// - **AllDay**: A date without a specific time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific instant, stored in UTC, with its display zone.
    DateTime {
        /// The instant.
        at: DateTime<Utc>,
        /// The zone the event was authored in.
        zone: Tz,
    },
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a zoned `EventTime` from a UTC instant and a display zone.
    pub fn from_utc(at: DateTime<Utc>, zone: Tz) -> Self {
        Self::DateTime { at, zone }
    }

    /// Creates a zoned `EventTime` from a datetime already carrying its zone.
    pub fn from_zoned(dt: DateTime<Tz>) -> Self {
        Self::DateTime {
            at: dt.with_timezone(&Utc),
            zone: dt.timezone(),
        }
    }

    /// Creates a zoned `EventTime` from wall-clock fields.
    ///
    /// Returns `None` when the local time does not exist in `zone` or is
    /// ambiguous (DST transitions).
    pub fn local(zone: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<Self> {
        zone.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .map(Self::from_zoned)
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the display zone. All-day dates are anchored in UTC.
    pub fn zone(&self) -> Tz {
        match self {
            Self::DateTime { zone, .. } => *zone,
            Self::AllDay(_) => Tz::UTC,
        }
    }

    /// Converts to a UTC datetime for comparison purposes.
    ///
    /// For all-day events, returns midnight UTC on that date.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime { at, .. } => *at,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns this time in its own display zone.
    pub fn to_zoned(&self) -> DateTime<Tz> {
        self.to_utc_datetime().with_timezone(&self.zone())
    }

    /// Returns the date portion of this event time, in its display zone.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime { .. } => self.to_zoned().date_naive(),
            Self::AllDay(date) => *date,
        }
    }

    /// Returns the wall-clock time in the display zone, `None` for all-day dates.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        match self {
            Self::DateTime { .. } => Some(self.to_zoned().time()),
            Self::AllDay(_) => None,
        }
    }

    /// Shifts this time by `delta`, keeping its variant and zone.
    ///
    /// All-day dates only move by whole days. Results saturate at the
    /// representable range instead of overflowing.
    pub fn shifted(&self, delta: TimeDelta) -> Self {
        let forward = delta >= TimeDelta::zero();
        match self {
            Self::DateTime { at, zone } => Self::DateTime {
                at: at.checked_add_signed(delta).unwrap_or(if forward {
                    DateTime::<Utc>::MAX_UTC
                } else {
                    DateTime::<Utc>::MIN_UTC
                }),
                zone: *zone,
            },
            Self::AllDay(date) => Self::AllDay(
                date.checked_add_signed(TimeDelta::days(delta.num_days()))
                    .unwrap_or(if forward { NaiveDate::MAX } else { NaiveDate::MIN }),
            ),
        }
    }

    /// Checks if this event time is before a given UTC datetime.
    pub fn is_before_utc(&self, dt: DateTime<Utc>) -> bool {
        self.to_utc_datetime() < dt
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}

/// A calendar difference between two instants.
///
/// Whole months are counted first (so "one month" follows the calendar rather
/// than a fixed number of days), then the remaining days, hours and minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarSpan {
    /// Set when the target lies before the reference instant.
    pub inverted: bool,
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl CalendarSpan {
    /// Computes the span from `from` to `to`.
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let (earlier, later, inverted) = if to < from {
            (to, from, true)
        } else {
            (from, to, false)
        };

        let mut months = i64::from(later.year() - earlier.year()) * 12
            + i64::from(later.month())
            - i64::from(earlier.month());
        let mut anchor = earlier;
        while months > 0 {
            match add_months(earlier, months) {
                Some(candidate) if candidate <= later => {
                    anchor = candidate;
                    break;
                }
                _ => months -= 1,
            }
        }
        let months = months.max(0);

        let rest = later - anchor;
        Self {
            inverted,
            years: months / 12,
            months: months % 12,
            days: rest.num_days(),
            hours: rest.num_hours() % 24,
            minutes: rest.num_minutes() % 60,
        }
    }
}

fn add_months(dt: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let months = u32::try_from(months).ok()?;
    dt.checked_add_months(Months::new(months))
}

/// The coarse bucket of a [`TimeDistance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceScale {
    Past,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DistanceScale {
    /// Returns the string representation used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// How far away an instant is, as a scale bucket plus magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistance {
    pub scale: DistanceScale,
    pub magnitude: i64,
}

impl TimeDistance {
    /// Classifies the distance from `now` to `target`.
    pub fn between(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        Self::classify(&CalendarSpan::between(now, target))
    }

    /// Buckets a calendar span.
    ///
    /// Inverted spans are always `{past, 1}`; otherwise the largest non-empty
    /// unit wins, with seven or more days reported as whole weeks.
    pub fn classify(span: &CalendarSpan) -> Self {
        let (scale, magnitude) = if span.inverted {
            (DistanceScale::Past, 1)
        } else if span.years > 0 {
            (DistanceScale::Year, span.years)
        } else if span.months > 0 {
            (DistanceScale::Month, span.months)
        } else if span.days >= 7 {
            (DistanceScale::Week, span.days / 7)
        } else if span.days > 0 {
            (DistanceScale::Day, span.days)
        } else if span.hours > 0 {
            (DistanceScale::Hour, span.hours)
        } else {
            (DistanceScale::Minute, span.minutes)
        };
        Self { scale, magnitude }
    }
}
