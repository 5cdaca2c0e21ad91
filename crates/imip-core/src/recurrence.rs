//! Recurrence rules and their expansion into concrete occurrences.
//!
//! A [`RecurrenceRule`] is the structured, read-only view of how an event
//! repeats. Rule-based frequencies are expanded with the `rrule` crate in the
//! event's own zone so that weekday and month-day selection follows the wall
//! clock the organizer saw. Fixed-date series are expanded from their explicit
//! date list.

use chrono::{DateTime, Month, Utc, Weekday};
use rrule::{NWeekday, RRule, RRuleSet};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::time::EventTime;

/// How often a series repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// An explicit list of dates instead of a rule.
    FixedDates,
}

impl Frequency {
    fn to_rrule(self) -> Option<rrule::Frequency> {
        match self {
            Self::Daily => Some(rrule::Frequency::Daily),
            Self::Weekly => Some(rrule::Frequency::Weekly),
            Self::Monthly => Some(rrule::Frequency::Monthly),
            Self::Yearly => Some(rrule::Frequency::Yearly),
            Self::FixedDates => None,
        }
    }
}

/// Structured recurrence of an event.
///
/// Positions in `relative_positions` follow the usual convention: `1..=5`
/// count from the start of the period, `-1..=-5` from its end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u16,
    /// UNTIL boundary of the rule.
    pub terminates_on: Option<DateTime<Utc>>,
    /// COUNT boundary of the rule.
    pub count: Option<u32>,
    /// Weekdays in the order they were authored.
    pub weekdays: Vec<Weekday>,
    pub month_days: Vec<i8>,
    pub relative_positions: Vec<i8>,
    /// Months of the year, `1..=12`.
    pub months_of_year: Vec<u32>,
    /// Dates of a [`Frequency::FixedDates`] series.
    pub explicit_dates: Vec<DateTime<Utc>>,
    /// Occurrence starts removed from the series.
    pub exception_dates: Vec<DateTime<Utc>>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            interval: 1,
            terminates_on: None,
            count: None,
            weekdays: Vec::new(),
            month_days: Vec::new(),
            relative_positions: Vec::new(),
            months_of_year: Vec::new(),
            explicit_dates: Vec::new(),
            exception_dates: Vec::new(),
        }
    }
}

impl RecurrenceRule {
    /// Creates a rule repeating every period of `frequency`.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            ..Default::default()
        }
    }

    /// Creates a fixed-date series.
    pub fn fixed_dates(dates: Vec<DateTime<Utc>>) -> Self {
        Self {
            frequency: Frequency::FixedDates,
            explicit_dates: dates,
            ..Default::default()
        }
    }

    /// Builder: set the interval between periods.
    pub fn with_interval(mut self, interval: u16) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Builder: terminate the series on an instant.
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.terminates_on = Some(until);
        self
    }

    /// Builder: terminate the series after `count` occurrences.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Builder: set the weekdays.
    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    /// Builder: set the days of the month.
    pub fn with_month_days(mut self, days: impl IntoIterator<Item = i8>) -> Self {
        self.month_days = days.into_iter().collect();
        self
    }

    /// Builder: set relative positions within the period.
    pub fn with_relative_positions(mut self, positions: impl IntoIterator<Item = i8>) -> Self {
        self.relative_positions = positions.into_iter().collect();
        self
    }

    /// Builder: set the months of the year.
    pub fn with_months(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.months_of_year = months.into_iter().collect();
        self
    }

    /// Builder: exclude occurrence starts.
    pub fn with_exception_dates(mut self, dates: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.exception_dates = dates.into_iter().collect();
        self
    }

    /// Returns `true` if the series never ends.
    pub fn is_unbounded(&self) -> bool {
        self.frequency != Frequency::FixedDates
            && self.terminates_on.is_none()
            && self.count.is_none()
    }

    /// Returns `true` if days are selected by position ("first Sunday")
    /// rather than by day number.
    pub fn uses_relative_days(&self) -> bool {
        !self.relative_positions.is_empty()
    }

    /// Expands the rule anchored at `start` into its occurrence set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRecurrence`] if the rule parts cannot form
    /// a valid rule.
    pub fn expand(&self, uid: &str, start: &EventTime) -> CoreResult<Occurrences> {
        let Some(frequency) = self.frequency.to_rrule() else {
            return Ok(Occurrences::Fixed(self.fixed_occurrences(start)));
        };

        let zone = match start {
            EventTime::AllDay(_) => rrule::Tz::UTC,
            EventTime::DateTime { zone, .. } => rrule::Tz::Tz(*zone),
        };
        let dt_start = start.to_utc_datetime().with_timezone(&zone);

        let mut rule = RRule::new(frequency).interval(self.interval.max(1));
        if !self.weekdays.is_empty() {
            rule = rule.by_weekday(self.weekdays.iter().copied().map(NWeekday::Every).collect());
        }
        if !self.month_days.is_empty() {
            rule = rule.by_month_day(self.month_days.clone());
        }
        if !self.relative_positions.is_empty() {
            rule = rule.by_set_pos(self.relative_positions.iter().map(|p| i32::from(*p)).collect());
        }
        if !self.months_of_year.is_empty() {
            let months = self
                .months_of_year
                .iter()
                .map(|m| month_from_number(*m))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    CoreError::invalid_recurrence(uid, format!("bad month {:?}", self.months_of_year))
                })?;
            rule = rule.by_month(&months);
        }
        if let Some(count) = self.count {
            rule = rule.count(count);
        }
        if let Some(until) = self.terminates_on {
            rule = rule.until(until.with_timezone(&zone));
        }

        let mut set = rule
            .build(dt_start)
            .map_err(|e| CoreError::invalid_recurrence(uid, e.to_string()))?;
        if !self.exception_dates.is_empty() {
            set = set.set_exdates(
                self.exception_dates
                    .iter()
                    .map(|d| d.with_timezone(&zone))
                    .collect(),
            );
        }
        Ok(Occurrences::Rule(Box::new(set)))
    }

    fn fixed_occurrences(&self, start: &EventTime) -> Vec<DateTime<Utc>> {
        let mut dates: Vec<DateTime<Utc>> = std::iter::once(start.to_utc_datetime())
            .chain(self.explicit_dates.iter().copied())
            .filter(|d| !self.exception_dates.contains(d))
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Returns the instant the series is declared to conclude on, if any.
    ///
    /// UNTIL wins; a COUNT-bounded series concludes on its last occurrence;
    /// a fixed-date series on its latest explicit date.
    pub fn conclusion(&self, occurrences: &Occurrences) -> Option<DateTime<Utc>> {
        if self.frequency == Frequency::FixedDates {
            return self
                .explicit_dates
                .iter()
                .max()
                .copied()
                .or_else(|| occurrences.iter().last());
        }
        if let Some(until) = self.terminates_on {
            return Some(until);
        }
        self.count.and_then(|_| occurrences.iter().last())
    }
}

fn month_from_number(n: u32) -> Option<Month> {
    u8::try_from(n).ok().and_then(|n| Month::try_from(n).ok())
}

/// The expanded occurrence starts of a series, in chronological order.
#[derive(Debug, Clone)]
pub enum Occurrences {
    Rule(Box<RRuleSet>),
    Fixed(Vec<DateTime<Utc>>),
}

impl Occurrences {
    /// Iterates over occurrence starts from the beginning of the series.
    ///
    /// Unbounded rules yield an endless iterator; callers must bound it.
    pub fn iter(&self) -> Box<dyn Iterator<Item = DateTime<Utc>> + '_> {
        match self {
            Self::Rule(set) => Box::new(set.as_ref().into_iter().map(|d| d.with_timezone(&Utc))),
            Self::Fixed(dates) => Box::new(dates.iter().copied()),
        }
    }

    /// Iterates over occurrence starts at or after `instant`.
    pub fn from_instant(
        &self,
        instant: DateTime<Utc>,
    ) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.iter().skip_while(move |d| *d < instant)
    }
}
