//! Natural-language "when" strings.
//!
//! Non-recurring events are described relative to now ("In 3 days on ...").
//! Recurring events go through the recurrence descriptor: one template per
//! frequency, selected by a match over (interval greater than one, time span,
//! conclusion). Every combination has a template, so selection cannot fall
//! through.

use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;
use imip_core::{
    DateWidth, DistanceScale, EventSnapshot, EventTime, Frequency, Locale, Occurrences,
    RecurrenceRule, TimeDistance,
};

/// Time-of-day part of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    EntireDay,
    /// Formatted start and end.
    Between(String, String),
}

impl Span {
    /// Builds the span of an event.
    ///
    /// The end always carries its zone; the start only when it differs.
    pub fn of(locale: &Locale<'_>, event: &EventSnapshot) -> Self {
        let Some(start_time) = event.start.time_of_day() else {
            return Self::EntireDay;
        };
        let start_zone = event.start.zone();
        let end = match event.effective_end() {
            end @ EventTime::DateTime { .. } => end,
            EventTime::AllDay(_) => event.start,
        };
        let end_zone = end.zone();
        let end_time = end.time_of_day().unwrap_or(start_time);

        let start = if start_zone == end_zone {
            locale.time(start_time)
        } else {
            format!("{} ({})", locale.time(start_time), start_zone.name())
        };
        let end = format!("{} ({})", locale.time(end_time), end_zone.name());
        Self::Between(start, end)
    }
}

/// Describes when `event` takes place.
///
/// `occurrences` is the expanded series of a recurring event; without it a
/// COUNT-bounded series is described as open-ended.
pub fn describe_when(
    locale: &Locale<'_>,
    event: &EventSnapshot,
    occurrences: Option<&Occurrences>,
    now: DateTime<Utc>,
) -> String {
    match &event.recurrence {
        None => describe_single(locale, event, now),
        Some(rule) => describe_recurrence(locale, event, rule, occurrences),
    }
}

fn describe_single(locale: &Locale<'_>, event: &EventSnapshot, now: DateTime<Utc>) -> String {
    let date = locale.date(event.start.date(), DateWidth::Full);
    let distance = TimeDistance::between(now, event.start.to_utc_datetime());
    let n = distance.magnitude;
    match (distance.scale, Span::of(locale, event)) {
        (DistanceScale::Past, Span::EntireDay) => {
            locale.t("In the past on %1$s for the entire day", &[&date])
        }
        (DistanceScale::Past, Span::Between(s, e)) => {
            locale.t("In the past on %1$s between %2$s - %3$s", &[&date, &s, &e])
        }
        (DistanceScale::Minute, Span::EntireDay) => locale.n(
            "In %n minute on %1$s for the entire day",
            "In %n minutes on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Minute, Span::Between(s, e)) => locale.n(
            "In %n minute on %1$s between %2$s - %3$s",
            "In %n minutes on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
        (DistanceScale::Hour, Span::EntireDay) => locale.n(
            "In %n hour on %1$s for the entire day",
            "In %n hours on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Hour, Span::Between(s, e)) => locale.n(
            "In %n hour on %1$s between %2$s - %3$s",
            "In %n hours on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
        (DistanceScale::Day, Span::EntireDay) => locale.n(
            "In %n day on %1$s for the entire day",
            "In %n days on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Day, Span::Between(s, e)) => locale.n(
            "In %n day on %1$s between %2$s - %3$s",
            "In %n days on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
        (DistanceScale::Week, Span::EntireDay) => locale.n(
            "In %n week on %1$s for the entire day",
            "In %n weeks on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Week, Span::Between(s, e)) => locale.n(
            "In %n week on %1$s between %2$s - %3$s",
            "In %n weeks on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
        (DistanceScale::Month, Span::EntireDay) => locale.n(
            "In %n month on %1$s for the entire day",
            "In %n months on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Month, Span::Between(s, e)) => locale.n(
            "In %n month on %1$s between %2$s - %3$s",
            "In %n months on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
        (DistanceScale::Year, Span::EntireDay) => locale.n(
            "In %n year on %1$s for the entire day",
            "In %n years on %1$s for the entire day",
            n,
            &[&date],
        ),
        (DistanceScale::Year, Span::Between(s, e)) => locale.n(
            "In %n year on %1$s between %2$s - %3$s",
            "In %n years on %1$s between %2$s - %3$s",
            n,
            &[&date, &s, &e],
        ),
    }
}

/// Describes a recurring event.
///
/// Must only be called for events carrying a recurrence rule.
pub fn describe_recurrence(
    locale: &Locale<'_>,
    event: &EventSnapshot,
    rule: &RecurrenceRule,
    occurrences: Option<&Occurrences>,
) -> String {
    let span = Span::of(locale, event);
    let interval = (rule.interval > 1).then(|| rule.interval.to_string());
    let interval = interval.as_deref();
    let zone = event.start.zone();
    let conclusion = match occurrences {
        Some(occurrences) => rule.conclusion(occurrences),
        None => rule.terminates_on,
    }
    .map(|at| long_date(locale, at, zone));
    let until = conclusion.as_deref();

    match rule.frequency {
        Frequency::Daily => daily(locale, interval, &span, until),
        Frequency::Weekly => {
            let days = weekday_list(locale, rule, &event.start);
            weekly(locale, interval, &days, &span, until)
        }
        Frequency::Monthly => {
            let on = if rule.uses_relative_days() {
                relative_days(locale, rule, &event.start)
            } else if rule.month_days.is_empty() {
                event.start.date().day().to_string()
            } else {
                join_numbers(&rule.month_days)
            };
            monthly(locale, interval, &on, &span, until)
        }
        Frequency::Yearly => {
            let months = month_list(locale, rule, &event.start);
            let on = if rule.uses_relative_days() {
                relative_days(locale, rule, &event.start)
            } else {
                locale.ordinal(event.start.date().day())
            };
            yearly(locale, interval, &months, &on, &span, until)
        }
        Frequency::FixedDates => {
            let last = rule
                .explicit_dates
                .iter()
                .max()
                .copied()
                .unwrap_or_else(|| event.start.to_utc_datetime());
            let until = until.map_or_else(|| long_date(locale, last, zone), str::to_string);
            fixed_dates(locale, &span, &until)
        }
    }
}

fn long_date(locale: &Locale<'_>, at: DateTime<Utc>, zone: Tz) -> String {
    locale.date(at.with_timezone(&zone).date_naive(), DateWidth::Long)
}

fn daily(locale: &Locale<'_>, interval: Option<&str>, span: &Span, until: Option<&str>) -> String {
    match (interval, span, until) {
        (None, Span::EntireDay, None) => locale.t("Every Day for the entire day", &[]),
        (None, Span::EntireDay, Some(u)) => {
            locale.t("Every Day for the entire day until %1$s", &[u])
        }
        (None, Span::Between(s, e), None) => locale.t("Every Day between %1$s - %2$s", &[s, e]),
        (None, Span::Between(s, e), Some(u)) => {
            locale.t("Every Day between %1$s - %2$s until %3$s", &[s, e, u])
        }
        (Some(n), Span::EntireDay, None) => locale.t("Every %1$d Days for the entire day", &[n]),
        (Some(n), Span::EntireDay, Some(u)) => {
            locale.t("Every %1$d Days for the entire day until %2$s", &[n, u])
        }
        (Some(n), Span::Between(s, e), None) => {
            locale.t("Every %1$d Days between %2$s - %3$s", &[n, s, e])
        }
        (Some(n), Span::Between(s, e), Some(u)) => locale.t(
            "Every %1$d Days between %2$s - %3$s until %4$s",
            &[n, s, e, u],
        ),
    }
}

fn weekly(
    locale: &Locale<'_>,
    interval: Option<&str>,
    days: &str,
    span: &Span,
    until: Option<&str>,
) -> String {
    match (interval, span, until) {
        (None, Span::EntireDay, None) => locale.t("Every Week on %1$s for the entire day", &[days]),
        (None, Span::EntireDay, Some(u)) => locale.t(
            "Every Week on %1$s for the entire day until %2$s",
            &[days, u],
        ),
        (None, Span::Between(s, e), None) => {
            locale.t("Every Week on %1$s between %2$s - %3$s", &[days, s, e])
        }
        (None, Span::Between(s, e), Some(u)) => locale.t(
            "Every Week on %1$s between %2$s - %3$s until %4$s",
            &[days, s, e, u],
        ),
        (Some(n), Span::EntireDay, None) => locale.t(
            "Every %1$d Weeks on %2$s for the entire day",
            &[n, days],
        ),
        (Some(n), Span::EntireDay, Some(u)) => locale.t(
            "Every %1$d Weeks on %2$s for the entire day until %3$s",
            &[n, days, u],
        ),
        (Some(n), Span::Between(s, e), None) => locale.t(
            "Every %1$d Weeks on %2$s between %3$s - %4$s",
            &[n, days, s, e],
        ),
        (Some(n), Span::Between(s, e), Some(u)) => locale.t(
            "Every %1$d Weeks on %2$s between %3$s - %4$s until %5$s",
            &[n, days, s, e, u],
        ),
    }
}

fn monthly(
    locale: &Locale<'_>,
    interval: Option<&str>,
    on: &str,
    span: &Span,
    until: Option<&str>,
) -> String {
    match (interval, span, until) {
        (None, Span::EntireDay, None) => {
            locale.t("Every Month on the %1$s for the entire day", &[on])
        }
        (None, Span::EntireDay, Some(u)) => locale.t(
            "Every Month on the %1$s for the entire day until %2$s",
            &[on, u],
        ),
        (None, Span::Between(s, e), None) => {
            locale.t("Every Month on the %1$s between %2$s - %3$s", &[on, s, e])
        }
        (None, Span::Between(s, e), Some(u)) => locale.t(
            "Every Month on the %1$s between %2$s - %3$s until %4$s",
            &[on, s, e, u],
        ),
        (Some(n), Span::EntireDay, None) => locale.t(
            "Every %1$d Months on the %2$s for the entire day",
            &[n, on],
        ),
        (Some(n), Span::EntireDay, Some(u)) => locale.t(
            "Every %1$d Months on the %2$s for the entire day until %3$s",
            &[n, on, u],
        ),
        (Some(n), Span::Between(s, e), None) => locale.t(
            "Every %1$d Months on the %2$s between %3$s - %4$s",
            &[n, on, s, e],
        ),
        (Some(n), Span::Between(s, e), Some(u)) => locale.t(
            "Every %1$d Months on the %2$s between %3$s - %4$s until %5$s",
            &[n, on, s, e, u],
        ),
    }
}

fn yearly(
    locale: &Locale<'_>,
    interval: Option<&str>,
    months: &str,
    on: &str,
    span: &Span,
    until: Option<&str>,
) -> String {
    match (interval, span, until) {
        (None, Span::EntireDay, None) => locale.t(
            "Every Year in %1$s on the %2$s for the entire day",
            &[months, on],
        ),
        (None, Span::EntireDay, Some(u)) => locale.t(
            "Every Year in %1$s on the %2$s for the entire day until %3$s",
            &[months, on, u],
        ),
        (None, Span::Between(s, e), None) => locale.t(
            "Every Year in %1$s on the %2$s between %3$s - %4$s",
            &[months, on, s, e],
        ),
        (None, Span::Between(s, e), Some(u)) => locale.t(
            "Every Year in %1$s on the %2$s between %3$s - %4$s until %5$s",
            &[months, on, s, e, u],
        ),
        (Some(n), Span::EntireDay, None) => locale.t(
            "Every %1$d Years in %2$s on the %3$s for the entire day",
            &[n, months, on],
        ),
        (Some(n), Span::EntireDay, Some(u)) => locale.t(
            "Every %1$d Years in %2$s on the %3$s for the entire day until %4$s",
            &[n, months, on, u],
        ),
        (Some(n), Span::Between(s, e), None) => locale.t(
            "Every %1$d Years in %2$s on the %3$s between %4$s - %5$s",
            &[n, months, on, s, e],
        ),
        (Some(n), Span::Between(s, e), Some(u)) => locale.t(
            "Every %1$d Years in %2$s on the %3$s between %4$s - %5$s until %6$s",
            &[n, months, on, s, e, u],
        ),
    }
}

fn fixed_dates(locale: &Locale<'_>, span: &Span, until: &str) -> String {
    match span {
        Span::EntireDay => locale.t("On specific dates for the entire day until %1$s", &[until]),
        Span::Between(s, e) => locale.t(
            "On specific dates between %1$s - %2$s until %3$s",
            &[s, e, until],
        ),
    }
}

fn weekday_list(locale: &Locale<'_>, rule: &RecurrenceRule, start: &EventTime) -> String {
    if rule.weekdays.is_empty() {
        return weekday_name(locale, start.date().weekday());
    }
    rule.weekdays
        .iter()
        .map(|d| weekday_name(locale, *d))
        .collect::<Vec<_>>()
        .join(", ")
}

fn relative_days(locale: &Locale<'_>, rule: &RecurrenceRule, start: &EventTime) -> String {
    let positions = rule
        .relative_positions
        .iter()
        .map(|p| position_name(locale, *p))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{positions} {}", weekday_list(locale, rule, start))
}

fn month_list(locale: &Locale<'_>, rule: &RecurrenceRule, start: &EventTime) -> String {
    if rule.months_of_year.is_empty() {
        return month_name(locale, start.date().month());
    }
    rule.months_of_year
        .iter()
        .map(|m| month_name(locale, *m))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_numbers(numbers: &[i8]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn weekday_name(locale: &Locale<'_>, day: Weekday) -> String {
    let name = match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    locale.t(name, &[])
}

fn month_name(locale: &Locale<'_>, month: u32) -> String {
    let name = match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        other => return other.to_string(),
    };
    locale.t(name, &[])
}

fn position_name(locale: &Locale<'_>, position: i8) -> String {
    let name = match position {
        1 => "First",
        2 => "Second",
        3 => "Third",
        4 => "Fourth",
        5 => "Fifth",
        -1 => "Last",
        -2 => "Second Last",
        -3 => "Third Last",
        -4 => "Fourth Last",
        -5 => "Fifth Last",
        other => return other.to_string(),
    };
    locale.t(name, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone};
    use chrono_tz::America::Toronto;
    use imip_core::EnglishTranslator;

    fn english() -> Locale<'static> {
        Locale::new(&EnglishTranslator, None)
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    /// 2024-07-08 8:00 to 9:00 in Toronto.
    fn timed() -> EventSnapshot {
        let start = EventTime::local(Toronto, 2024, 7, 8, 8, 0).unwrap();
        EventSnapshot::new("uid", start).with_end(start.shifted(TimeDelta::hours(1)))
    }

    /// 2024-07-08, all day.
    fn all_day() -> EventSnapshot {
        let day = NaiveDate::from_ymd_opt(2024, 7, 8).unwrap();
        EventSnapshot::new("uid", EventTime::from_date(day))
    }

    fn recurring(event: EventSnapshot, rule: RecurrenceRule) -> String {
        let event = event.with_recurrence(rule.clone());
        let occurrences = rule.expand(&event.uid, &event.start).unwrap();
        describe_when(&english(), &event, Some(&occurrences), utc(2024, 7, 1, 0))
    }

    mod span {
        use super::*;

        #[test]
        fn all_day_is_entire_day() {
            assert_eq!(Span::of(&english(), &all_day()), Span::EntireDay);
        }

        #[test]
        fn end_carries_zone() {
            assert_eq!(
                Span::of(&english(), &timed()),
                Span::Between("8:00 AM".into(), "9:00 AM (America/Toronto)".into())
            );
        }

        #[test]
        fn start_carries_zone_when_zones_differ() {
            let start = EventTime::local(chrono_tz::Europe::Paris, 2024, 7, 8, 14, 0).unwrap();
            let end = EventTime::local(Toronto, 2024, 7, 8, 9, 0).unwrap();
            let event = EventSnapshot::new("uid", start).with_end(end);
            assert_eq!(
                Span::of(&english(), &event),
                Span::Between(
                    "2:00 PM (Europe/Paris)".into(),
                    "9:00 AM (America/Toronto)".into()
                )
            );
        }
    }

    mod single {
        use super::*;

        fn describe(event: &EventSnapshot, now: DateTime<Utc>) -> String {
            describe_when(&english(), event, None, now)
        }

        #[test]
        fn past() {
            assert_eq!(
                describe(&all_day(), utc(2024, 7, 10, 0)),
                "In the past on Monday, July 8, 2024 for the entire day"
            );
            assert_eq!(
                describe(&timed(), utc(2024, 7, 10, 0)),
                "In the past on Monday, July 8, 2024 between 8:00 AM - 9:00 AM (America/Toronto)"
            );
        }

        #[test]
        fn upcoming_scales() {
            let event = timed();
            assert_eq!(
                describe(&event, utc(2024, 7, 8, 11)),
                "In 1 hour on Monday, July 8, 2024 between 8:00 AM - 9:00 AM (America/Toronto)"
            );
            assert_eq!(
                describe(&event, utc(2024, 7, 5, 12)),
                "In 3 days on Monday, July 8, 2024 between 8:00 AM - 9:00 AM (America/Toronto)"
            );
            assert_eq!(
                describe(&all_day(), utc(2024, 6, 24, 0)),
                "In 2 weeks on Monday, July 8, 2024 for the entire day"
            );
            assert_eq!(
                describe(&all_day(), utc(2023, 7, 8, 0)),
                "In 1 year on Monday, July 8, 2024 for the entire day"
            );
        }
    }

    mod daily {
        use super::*;

        #[test]
        fn all_templates() {
            let until = utc(2024, 7, 13, 8);
            let rule = RecurrenceRule::new(Frequency::Daily);
            assert_eq!(recurring(all_day(), rule.clone()), "Every Day for the entire day");
            assert_eq!(
                recurring(all_day(), rule.clone().until(until)),
                "Every Day for the entire day until July 13, 2024"
            );
            assert_eq!(
                recurring(timed(), rule.clone()),
                "Every Day between 8:00 AM - 9:00 AM (America/Toronto)"
            );
            assert_eq!(
                recurring(timed(), rule.clone().until(until)),
                "Every Day between 8:00 AM - 9:00 AM (America/Toronto) until July 13, 2024"
            );
            let rule = rule.with_interval(3);
            assert_eq!(recurring(all_day(), rule.clone()), "Every 3 Days for the entire day");
            assert_eq!(
                recurring(all_day(), rule.clone().until(until)),
                "Every 3 Days for the entire day until July 13, 2024"
            );
            assert_eq!(
                recurring(timed(), rule.clone()),
                "Every 3 Days between 8:00 AM - 9:00 AM (America/Toronto)"
            );
            assert_eq!(
                recurring(timed(), rule.until(until)),
                "Every 3 Days between 8:00 AM - 9:00 AM (America/Toronto) until July 13, 2024"
            );
        }

        #[test]
        fn count_concludes_on_last_occurrence() {
            let rule = RecurrenceRule::new(Frequency::Daily).with_count(3);
            assert_eq!(
                recurring(all_day(), rule),
                "Every Day for the entire day until July 10, 2024"
            );
        }
    }

    mod weekly {
        use super::*;

        fn rule() -> RecurrenceRule {
            RecurrenceRule::new(Frequency::Weekly).with_weekdays([
                Weekday::Mon,
                Weekday::Wed,
                Weekday::Fri,
            ])
        }

        #[test]
        fn all_templates() {
            let until = utc(2024, 7, 13, 8);
            assert_eq!(
                recurring(all_day(), rule()),
                "Every Week on Monday, Wednesday, Friday for the entire day"
            );
            assert_eq!(
                recurring(all_day(), rule().until(until)),
                "Every Week on Monday, Wednesday, Friday for the entire day until July 13, 2024"
            );
            assert_eq!(
                recurring(timed(), rule().until(until)),
                "Every Week on Monday, Wednesday, Friday between 8:00 AM - 9:00 AM (America/Toronto) until July 13, 2024"
            );
            assert_eq!(
                recurring(timed(), rule().with_interval(2)),
                "Every 2 Weeks on Monday, Wednesday, Friday between 8:00 AM - 9:00 AM (America/Toronto)"
            );
            assert_eq!(
                recurring(all_day(), rule().with_interval(2).until(until)),
                "Every 2 Weeks on Monday, Wednesday, Friday for the entire day until July 13, 2024"
            );
        }

        #[test]
        fn keeps_rule_order() {
            let rule = RecurrenceRule::new(Frequency::Weekly)
                .with_interval(2)
                .with_weekdays([Weekday::Mon, Weekday::Wed])
                .until(utc(2024, 8, 31, 0));
            assert_eq!(
                recurring(all_day(), rule),
                "Every 2 Weeks on Monday, Wednesday for the entire day until August 31, 2024"
            );
            let rule = RecurrenceRule::new(Frequency::Weekly).with_weekdays([Weekday::Fri, Weekday::Mon]);
            assert_eq!(
                recurring(all_day(), rule),
                "Every Week on Friday, Monday for the entire day"
            );
        }

        #[test]
        fn defaults_to_start_weekday() {
            assert_eq!(
                recurring(all_day(), RecurrenceRule::new(Frequency::Weekly)),
                "Every Week on Monday for the entire day"
            );
        }
    }

    mod monthly {
        use super::*;

        #[test]
        fn absolute_days() {
            let until = utc(2024, 12, 31, 8);
            let rule = RecurrenceRule::new(Frequency::Monthly).with_month_days([1, 8]);
            assert_eq!(
                recurring(all_day(), rule.clone().until(until)),
                "Every Month on the 1, 8 for the entire day until December 31, 2024"
            );
            assert_eq!(
                recurring(timed(), rule.with_interval(2).until(until)),
                "Every 2 Months on the 1, 8 between 8:00 AM - 9:00 AM (America/Toronto) until December 31, 2024"
            );
        }

        #[test]
        fn absolute_defaults_to_start_day() {
            assert_eq!(
                recurring(all_day(), RecurrenceRule::new(Frequency::Monthly)),
                "Every Month on the 8 for the entire day"
            );
        }

        #[test]
        fn relative_days() {
            let until = utc(2024, 12, 31, 8);
            let rule = RecurrenceRule::new(Frequency::Monthly)
                .with_weekdays([Weekday::Sun, Weekday::Sat])
                .with_relative_positions([1]);
            assert_eq!(
                recurring(all_day(), rule.clone().until(until)),
                "Every Month on the First Sunday, Saturday for the entire day until December 31, 2024"
            );
            assert_eq!(
                recurring(timed(), rule.with_interval(2)),
                "Every 2 Months on the First Sunday, Saturday between 8:00 AM - 9:00 AM (America/Toronto)"
            );
        }

        #[test]
        fn last_positions() {
            let rule = RecurrenceRule::new(Frequency::Monthly)
                .with_weekdays([Weekday::Fri])
                .with_relative_positions([-1, -2]);
            assert_eq!(
                recurring(all_day(), rule),
                "Every Month on the Last, Second Last Friday for the entire day"
            );
        }
    }

    mod yearly {
        use super::*;

        fn july_first() -> EventSnapshot {
            let start = EventTime::local(Toronto, 2024, 7, 1, 8, 0).unwrap();
            EventSnapshot::new("uid", start).with_end(start.shifted(TimeDelta::hours(1)))
        }

        #[test]
        fn absolute_day() {
            let until = utc(2026, 7, 31, 8);
            let rule = RecurrenceRule::new(Frequency::Yearly);
            assert_eq!(
                recurring(july_first(), rule.clone().until(until)),
                "Every Year in July on the 1st between 8:00 AM - 9:00 AM (America/Toronto) until July 31, 2026"
            );
            assert_eq!(
                recurring(july_first(), rule.with_interval(2)),
                "Every 2 Years in July on the 1st between 8:00 AM - 9:00 AM (America/Toronto)"
            );
        }

        #[test]
        fn month_days_render_the_start_day() {
            let start = EventTime::from_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
            let event = EventSnapshot::new("uid", start);
            let rule = RecurrenceRule::new(Frequency::Yearly).with_month_days([-1]);
            assert_eq!(
                recurring(event, rule),
                "Every Year in January on the 31st for the entire day"
            );
        }

        #[test]
        fn relative_days_and_months() {
            let rule = RecurrenceRule::new(Frequency::Yearly)
                .with_months([7])
                .with_weekdays([Weekday::Sun, Weekday::Sat])
                .with_relative_positions([1])
                .until(utc(2026, 7, 31, 8));
            assert_eq!(
                recurring(all_day(), rule),
                "Every Year in July on the First Sunday, Saturday for the entire day until July 31, 2026"
            );
        }
    }

    mod fixed {
        use super::*;

        #[test]
        fn always_has_conclusion() {
            let rule = RecurrenceRule::fixed_dates(vec![utc(2024, 7, 10, 12), utc(2024, 7, 13, 12)]);
            assert_eq!(
                recurring(all_day(), rule.clone()),
                "On specific dates for the entire day until July 13, 2024"
            );
            assert_eq!(
                recurring(timed(), rule),
                "On specific dates between 8:00 AM - 9:00 AM (America/Toronto) until July 13, 2024"
            );
        }

        #[test]
        fn without_expansion_uses_explicit_dates() {
            let rule = RecurrenceRule::fixed_dates(vec![utc(2024, 7, 13, 12)]);
            let event = all_day().with_recurrence(rule.clone());
            assert_eq!(
                describe_recurrence(&english(), &event, &rule, None),
                "On specific dates for the entire day until July 13, 2024"
            );
        }
    }
}
