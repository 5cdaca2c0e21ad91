//! Scheduler configuration.
//!
//! Settings can be built in code with the `with_*` builders or loaded from a
//! TOML file:
//!
//! ```toml
//! instance_name = "Acme Calendar"
//! from_address = "invitations-noreply@acme.test"
//! base_url = "https://cloud.acme.test/apps/dav"
//! invitation_link_recipients = "alice@acme.test, partner.test"
//! list_attendees = true
//! ```

use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SchedulerError, SchedulerResult};

/// Who may receive accept/decline links in invitations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPolicy", into = "RawPolicy")]
pub enum LinkRecipientPolicy {
    /// Every recipient.
    #[default]
    Everyone,
    /// No recipient.
    Nobody,
    /// Recipients whose address or domain is listed (lowercase).
    Listed(Vec<String>),
}

impl LinkRecipientPolicy {
    /// Parses the textual form: `yes`, `no`, or a comma separated list of
    /// addresses and bare domains. Whitespace and case are ignored.
    pub fn parse(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let entries: Vec<String> = normalized
            .split(',')
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        match entries.first().map(String::as_str) {
            Some("yes") => Self::Everyone,
            None | Some("no") => Self::Nobody,
            Some(_) => Self::Listed(entries),
        }
    }

    /// Returns `true` if `email` (without scheme) may receive response links.
    ///
    /// Listed entries match the exact address or its exact domain;
    /// subdomains are not matched.
    pub fn permits(&self, email: &str) -> bool {
        match self {
            Self::Everyone => true,
            Self::Nobody => false,
            Self::Listed(entries) => {
                let email = email.to_lowercase();
                let domain = email.rsplit_once('@').map(|(_, d)| d);
                entries
                    .iter()
                    .any(|e| *e == email || Some(e.as_str()) == domain)
            }
        }
    }
}

impl fmt::Display for LinkRecipientPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Everyone => f.write_str("yes"),
            Self::Nobody => f.write_str("no"),
            Self::Listed(entries) => f.write_str(&entries.join(",")),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPolicy {
    Flag(bool),
    Text(String),
}

impl From<RawPolicy> for LinkRecipientPolicy {
    fn from(raw: RawPolicy) -> Self {
        match raw {
            RawPolicy::Flag(true) => Self::Everyone,
            RawPolicy::Flag(false) => Self::Nobody,
            RawPolicy::Text(text) => Self::parse(&text),
        }
    }
}

impl From<LinkRecipientPolicy> for RawPolicy {
    fn from(policy: LinkRecipientPolicy) -> Self {
        Self::Text(policy.to_string())
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Product name shown as the sender when no person is known.
    pub instance_name: String,

    /// Envelope sender of every notification.
    pub from_address: String,

    /// Absolute base URL the response links are built on.
    pub base_url: String,

    /// Who receives accept/decline links.
    pub invitation_link_recipients: LinkRecipientPolicy,

    /// List organizer and attendees in the notification body.
    pub list_attendees: bool,

    /// Date whose UTC midnight bounds every last-occurrence computation.
    pub last_occurrence_ceiling: NaiveDate,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            instance_name: "Calendar".to_string(),
            from_address: "invitations-noreply@localhost".to_string(),
            base_url: "http://localhost/apps/dav".to_string(),
            invitation_link_recipients: LinkRecipientPolicy::Everyone,
            list_attendees: false,
            last_occurrence_ceiling: NaiveDate::from_ymd_opt(2038, 1, 1).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl SchedulerConfig {
    /// Parses configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> SchedulerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SchedulerError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks values that cannot be expressed in the types.
    pub fn validate(&self) -> SchedulerResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| SchedulerError::config(format!("invalid base_url {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SchedulerError::config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.from_address.trim().is_empty() {
            return Err(SchedulerError::config("from_address must not be empty"));
        }
        Ok(())
    }

    /// Builder: set the instance name.
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    /// Builder: set the envelope sender.
    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.from_address = address.into();
        self
    }

    /// Builder: set the base URL of response links.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: set the response link policy.
    pub fn with_link_recipients(mut self, policy: LinkRecipientPolicy) -> Self {
        self.invitation_link_recipients = policy;
        self
    }

    /// Builder: list organizer and attendees.
    pub fn with_list_attendees(mut self, list: bool) -> Self {
        self.list_attendees = list;
        self
    }

    /// Builder: set the last-occurrence ceiling.
    pub fn with_last_occurrence_ceiling(mut self, date: NaiveDate) -> Self {
        self.last_occurrence_ceiling = date;
        self
    }

    /// The ceiling as an instant.
    pub fn ceiling(&self) -> DateTime<Utc> {
        self.last_occurrence_ceiling.and_time(NaiveTime::MIN).and_utc()
    }

    /// Builds the response URL for `action` (`accept`, `decline`, `moreOptions`).
    pub fn response_url(&self, action: &str, token: &str) -> String {
        format!(
            "{}/invitation/{action}/{token}",
            self.base_url.trim_end_matches('/')
        )
    }
}
