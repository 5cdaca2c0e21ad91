//! Next-occurrence preview for recurring events.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use imip_core::{DateWidth, DistanceScale, Locale, Occurrences, TimeDistance};

/// Up to three upcoming occurrence starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upcoming {
    One(DateTime<Utc>),
    Two(DateTime<Utc>, DateTime<Utc>),
    Three(DateTime<Utc>, DateTime<Utc>, DateTime<Utc>),
}

impl Upcoming {
    /// Returns the first upcoming start.
    pub fn first(&self) -> DateTime<Utc> {
        match *self {
            Self::One(a) | Self::Two(a, _) | Self::Three(a, _, _) => a,
        }
    }
}

/// Upcoming occurrences and how far away the first one is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookahead {
    pub upcoming: Upcoming,
    pub distance: TimeDistance,
}

impl Lookahead {
    /// Collects the occurrences at or after `now`.
    ///
    /// Returns `None` when the series has no occurrence left. Never looks at
    /// more than three occurrences, however long the series is.
    pub fn from_now(occurrences: &Occurrences, now: DateTime<Utc>) -> Option<Self> {
        let mut cursor = occurrences.from_instant(now);
        let first = cursor.next()?;
        let upcoming = match (cursor.next(), cursor.next()) {
            (Some(second), Some(third)) => Upcoming::Three(first, second, third),
            (Some(second), None) => Upcoming::Two(first, second),
            (None, _) => Upcoming::One(first),
        };
        Some(Self {
            upcoming,
            distance: TimeDistance::between(now, first),
        })
    }

    /// Renders the preview, dates shown in `zone`.
    pub fn describe(&self, locale: &Locale<'_>, zone: Tz) -> String {
        let date = |at: DateTime<Utc>| {
            locale.date(at.with_timezone(&zone).date_naive(), DateWidth::Long)
        };
        let dates = match self.upcoming {
            Upcoming::One(a) => vec![date(a)],
            Upcoming::Two(a, b) => vec![date(a), date(b)],
            Upcoming::Three(a, b, c) => vec![date(a), date(b), date(c)],
        };
        let args: Vec<&str> = dates.iter().map(String::as_str).collect();

        let (singular, plural) = templates(self.distance.scale, &self.upcoming);
        match self.distance.scale {
            DistanceScale::Past => locale.t(singular, &args),
            _ => locale.n(singular, plural, self.distance.magnitude, &args),
        }
    }
}

/// Singular and plural keys for one (scale, date count) pair.
fn templates(scale: DistanceScale, upcoming: &Upcoming) -> (&'static str, &'static str) {
    use DistanceScale as S;
    use Upcoming as U;
    match (scale, upcoming) {
        (S::Past, U::One(..)) => ("In the past on %1$s", "In the past on %1$s"),
        (S::Past, U::Two(..)) => (
            "In the past on %1$s then on %2$s",
            "In the past on %1$s then on %2$s",
        ),
        (S::Past, U::Three(..)) => (
            "In the past on %1$s then on %2$s and %3$s",
            "In the past on %1$s then on %2$s and %3$s",
        ),
        (S::Minute, U::One(..)) => ("In %n minute on %1$s", "In %n minutes on %1$s"),
        (S::Minute, U::Two(..)) => (
            "In %n minute on %1$s then on %2$s",
            "In %n minutes on %1$s then on %2$s",
        ),
        (S::Minute, U::Three(..)) => (
            "In %n minute on %1$s then on %2$s and %3$s",
            "In %n minutes on %1$s then on %2$s and %3$s",
        ),
        (S::Hour, U::One(..)) => ("In %n hour on %1$s", "In %n hours on %1$s"),
        (S::Hour, U::Two(..)) => (
            "In %n hour on %1$s then on %2$s",
            "In %n hours on %1$s then on %2$s",
        ),
        (S::Hour, U::Three(..)) => (
            "In %n hour on %1$s then on %2$s and %3$s",
            "In %n hours on %1$s then on %2$s and %3$s",
        ),
        (S::Day, U::One(..)) => ("In %n day on %1$s", "In %n days on %1$s"),
        (S::Day, U::Two(..)) => (
            "In %n day on %1$s then on %2$s",
            "In %n days on %1$s then on %2$s",
        ),
        (S::Day, U::Three(..)) => (
            "In %n day on %1$s then on %2$s and %3$s",
            "In %n days on %1$s then on %2$s and %3$s",
        ),
        (S::Week, U::One(..)) => ("In %n week on %1$s", "In %n weeks on %1$s"),
        (S::Week, U::Two(..)) => (
            "In %n week on %1$s then on %2$s",
            "In %n weeks on %1$s then on %2$s",
        ),
        (S::Week, U::Three(..)) => (
            "In %n week on %1$s then on %2$s and %3$s",
            "In %n weeks on %1$s then on %2$s and %3$s",
        ),
        (S::Month, U::One(..)) => ("In %n month on %1$s", "In %n months on %1$s"),
        (S::Month, U::Two(..)) => (
            "In %n month on %1$s then on %2$s",
            "In %n months on %1$s then on %2$s",
        ),
        (S::Month, U::Three(..)) => (
            "In %n month on %1$s then on %2$s and %3$s",
            "In %n months on %1$s then on %2$s and %3$s",
        ),
        (S::Year, U::One(..)) => ("In %n year on %1$s", "In %n years on %1$s"),
        (S::Year, U::Two(..)) => (
            "In %n year on %1$s then on %2$s",
            "In %n years on %1$s then on %2$s",
        ),
        (S::Year, U::Three(..)) => (
            "In %n year on %1$s then on %2$s and %3$s",
            "In %n years on %1$s then on %2$s and %3$s",
        ),
    }
}
