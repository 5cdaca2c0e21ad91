//! Core types: time distance, events, recurrence, localization, formatting

pub mod error;
pub mod event;
pub mod format;
pub mod l10n;
pub mod links;
pub mod recurrence;
pub mod time;
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use event::{
    CalendarUserType, EventSnapshot, Participant, ParticipationStatus, Role, strip_mailto,
};
pub use format::{bulletize, html_escape, hyperlink, strike, strike_through};
pub use l10n::{DateWidth, EnglishTranslator, Locale, Translator};
pub use links::{is_web_url, linkify};
pub use recurrence::{Frequency, Occurrences, RecurrenceRule};
pub use time::{CalendarSpan, DistanceScale, EventTime, TimeDistance};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
