//! Contact form submission record and its validation rules.
//!
//! The rules run in two places: the page validates before posting, and the
//! gateway re-validates whatever arrives over HTTP. The two sets differ in
//! wording and in two details. The page also rejects a blank phone, and the
//! server requires a top-level domain of at least two characters.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Placeholder used for an omitted partner or event field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder used for an omitted message.
pub const NO_MESSAGE: &str = "No message provided";

/// A single contact form submission.
///
/// Every field is optional at the type level so that a missing field turns
/// into a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Date or period the visitor is interested in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    DateInfo,
}

impl Field {
    /// Form field name as used in the page markup and the JSON body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::DateInfo => "dateInfo",
        }
    }

    /// Message reported by the server.
    pub fn server_message(&self) -> &'static str {
        match self {
            Field::Name => "Name must contain at least 2 characters.",
            Field::Email => "Please provide a valid email address.",
            Field::Phone => "Please provide a valid phone number.",
            Field::DateInfo => "Please provide a date or period of interest.",
        }
    }

    /// Message shown next to the input on the page.
    pub fn form_message(&self) -> &'static str {
        match self {
            Field::Name => "Your name must contain at least 2 characters.",
            Field::Email => "Please enter a valid email address.",
            Field::Phone => "Please enter a valid phone number.",
            Field::DateInfo => "Please specify a date or period of interest.",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn server(field: Field) -> Self {
        Self {
            field,
            message: field.server_message().to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn page_email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn server_email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid server email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+0-9\s\-().]{7,20}$").expect("valid phone pattern"))
}

/// Length is counted in UTF-16 units, as the browser counts it.
fn has_min_trimmed_len(value: Option<&str>, min: usize) -> bool {
    value.is_some_and(|v| v.trim().encode_utf16().count() >= min)
}

/// Treat empty strings the same as absent values.
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Which side is checking the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rules {
    /// Checks run by the page before posting
    Page,
    /// Checks run by the server on every request
    Server,
}

impl Submission {
    /// Fields that fail the server rules, in form order.
    pub fn invalid_fields(&self) -> Vec<Field> {
        self.invalid_fields_for(Rules::Server)
    }

    /// Fields that fail the given rule set, in form order.
    pub fn invalid_fields_for(&self, rules: Rules) -> Vec<Field> {
        let mut invalid = Vec::new();

        if !has_min_trimmed_len(self.name.as_deref(), 2) {
            invalid.push(Field::Name);
        }

        let email = match rules {
            Rules::Page => page_email_pattern(),
            Rules::Server => server_email_pattern(),
        };
        if !self.email.as_deref().is_some_and(|e| email.is_match(e)) {
            invalid.push(Field::Email);
        }

        let phone_ok = self.phone.as_deref().is_some_and(|p| {
            phone_pattern().is_match(p) && (rules == Rules::Server || !p.trim().is_empty())
        });
        if !phone_ok {
            invalid.push(Field::Phone);
        }
        if !has_min_trimmed_len(self.date_info.as_deref(), 2) {
            invalid.push(Field::DateInfo);
        }

        invalid
    }

    /// Validate the submission, returning server-worded errors.
    ///
    /// An empty list means the submission can be relayed.
    pub fn validate(&self) -> Vec<FieldError> {
        self.invalid_fields()
            .into_iter()
            .map(FieldError::server)
            .collect()
    }

    /// Whether every rule passes.
    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }

    pub fn partner_or_placeholder(&self) -> &str {
        provided(&self.partner).unwrap_or(NOT_AVAILABLE)
    }

    pub fn event_or_placeholder(&self) -> &str {
        provided(&self.event).unwrap_or(NOT_AVAILABLE)
    }

    pub fn message_or_placeholder(&self) -> &str {
        provided(&self.message).unwrap_or(NO_MESSAGE)
    }
}
