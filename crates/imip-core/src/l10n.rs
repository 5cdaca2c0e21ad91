//! Localization seam.
//!
//! Message text is keyed by its English source string with positional
//! placeholders (`%1$s`, `%2$d`) and, for plural forms, `%n`. A
//! [`Translator`] turns keys into localized text for an optional language
//! override; [`Locale`] binds a translator to one language for the duration
//! of a single message. [`EnglishTranslator`] is the built-in fallback.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};

/// Matches positional placeholders such as `%1$s` or `%2$d`.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(\d+)\$[sd]").expect("Invalid placeholder regex"));

/// How much of a date to spell out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWidth {
    /// Weekday, month, day and year.
    Full,
    /// Month, day and year.
    Long,
}

/// Translation and pluralization primitive.
pub trait Translator: Send + Sync {
    /// Translates `text`, substituting positional `args`.
    fn translate(&self, language: Option<&str>, text: &str, args: &[&str]) -> String;

    /// Translates a plural form chosen by `count`. `%n` is replaced by the count.
    fn translate_plural(
        &self,
        language: Option<&str>,
        singular: &str,
        plural: &str,
        count: i64,
        args: &[&str],
    ) -> String;

    /// Formats a calendar date.
    fn format_date(&self, language: Option<&str>, date: NaiveDate, width: DateWidth) -> String;

    /// Formats a wall-clock time.
    fn format_time(&self, language: Option<&str>, time: NaiveTime) -> String;

    /// Formats an ordinal day number such as `1st`.
    fn format_ordinal(&self, _language: Option<&str>, n: u32) -> String {
        english_ordinal(n)
    }
}

/// Substitutes positional placeholders in `text`.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(text: &str, args: &[&str]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), |arg| (*arg).to_string())
        })
        .into_owned()
}

/// English ordinal suffix for a day number.
pub fn english_ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Built-in translator producing the English source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, _language: Option<&str>, text: &str, args: &[&str]) -> String {
        interpolate(text, args)
    }

    fn translate_plural(
        &self,
        _language: Option<&str>,
        singular: &str,
        plural: &str,
        count: i64,
        args: &[&str],
    ) -> String {
        let form = if count == 1 { singular } else { plural };
        interpolate(form, args).replace("%n", &count.to_string())
    }

    fn format_date(&self, _language: Option<&str>, date: NaiveDate, width: DateWidth) -> String {
        match width {
            DateWidth::Full => date.format("%A, %B %-d, %Y").to_string(),
            DateWidth::Long => date.format("%B %-d, %Y").to_string(),
        }
    }

    fn format_time(&self, _language: Option<&str>, time: NaiveTime) -> String {
        time.format("%-I:%M %p").to_string()
    }
}

/// A translator bound to one language.
#[derive(Clone, Copy)]
pub struct Locale<'a> {
    translator: &'a dyn Translator,
    language: Option<&'a str>,
}

impl std::fmt::Debug for Locale<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locale")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl<'a> Locale<'a> {
    /// Binds `translator` to `language` (`None` for the instance default).
    pub fn new(translator: &'a dyn Translator, language: Option<&'a str>) -> Self {
        Self {
            translator,
            language,
        }
    }

    /// Returns the bound language.
    pub fn language(&self) -> Option<&'a str> {
        self.language
    }

    /// Translates `text`.
    pub fn t(&self, text: &str, args: &[&str]) -> String {
        self.translator.translate(self.language, text, args)
    }

    /// Translates a plural form.
    pub fn n(&self, singular: &str, plural: &str, count: i64, args: &[&str]) -> String {
        self.translator
            .translate_plural(self.language, singular, plural, count, args)
    }

    /// Formats a date.
    pub fn date(&self, date: NaiveDate, width: DateWidth) -> String {
        self.translator.format_date(self.language, date, width)
    }

    /// Formats a time of day.
    pub fn time(&self, time: NaiveTime) -> String {
        self.translator.format_time(self.language, time)
    }

    /// Formats an ordinal day number.
    pub fn ordinal(&self, n: u32) -> String {
        self.translator.format_ordinal(self.language, n)
    }
}
