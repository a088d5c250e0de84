//! Complaint draft and the field validator.
//!
//! RULE: There is exactly one validation entry point, `validate()`.
//! Every submit path goes through it, so required-field and minimum-length
//! thresholds cannot drift apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidateEmail, ValidateLength};

use crate::config::{FormConfig, DEFAULT_MIN_DESCRIPTION_CHARS};

/// Address shape accepted on top of the RFC syntax check: a local part of
/// letters, digits and `_ ' + - .` and a dotted domain whose last label is
/// at least two letters.
pub const EMAIL_PATTERN: &str =
    r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub full_name:       String,
    pub email:           String,
    pub phone_number:    Option<String>,
    pub advisor_name:    String,
    pub description:     String,
    pub supporting_docs: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    FullName,
    Email,
    PhoneNumber,
    AdvisorName,
    Description,
    SupportingDocs,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName       => "full_name",
            Self::Email          => "email",
            Self::PhoneNumber    => "phone_number",
            Self::AdvisorName    => "advisor_name",
            Self::Description    => "description",
            Self::SupportingDocs => "supporting_docs",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ComplaintDraft {
    /// Set one field from raw input. Blank optional fields become None.
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        let optional = |v: String| if v.is_empty() { None } else { Some(v) };
        match field {
            FieldName::FullName       => self.full_name = value,
            FieldName::Email          => self.email = value,
            FieldName::PhoneNumber    => self.phone_number = optional(value),
            FieldName::AdvisorName    => self.advisor_name = value,
            FieldName::Description    => self.description = value,
            FieldName::SupportingDocs => self.supporting_docs = optional(value),
        }
    }

    pub fn field(&self, field: FieldName) -> &str {
        match field {
            FieldName::FullName       => &self.full_name,
            FieldName::Email          => &self.email,
            FieldName::PhoneNumber    => self.phone_number.as_deref().unwrap_or(""),
            FieldName::AdvisorName    => &self.advisor_name,
            FieldName::Description    => &self.description,
            FieldName::SupportingDocs => self.supporting_docs.as_deref().unwrap_or(""),
        }
    }

    /// Description length in characters (Unicode scalar values).
    pub fn description_chars(&self) -> usize {
        self.description.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming whitespace.
    Required,
    /// Email syntax with a dotted, alphabetic top-level domain.
    Email,
    /// At least `FieldRules::min_description_chars` characters.
    MinChars,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field:   FieldName,
    pub rule:    Rule,
    pub message: &'static str,
}

/// The form schema. Phone number and supporting docs are unconstrained.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule { field: FieldName::FullName,    rule: Rule::Required, message: "Full name is required" },
    FieldRule { field: FieldName::Email,       rule: Rule::Email,    message: "Please enter a valid email address" },
    FieldRule { field: FieldName::AdvisorName, rule: Rule::Required, message: "Sterling Advisor name is required" },
    FieldRule { field: FieldName::Description, rule: Rule::MinChars, message: "" },
];

/// Thresholds the schema reads at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub min_description_chars: usize,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self { min_description_chars: DEFAULT_MIN_DESCRIPTION_CHARS }
    }
}

impl From<&FormConfig> for FieldRules {
    fn from(config: &FormConfig) -> Self {
        Self { min_description_chars: config.min_description_chars }
    }
}

impl FieldRules {
    pub fn min_chars_message(&self) -> String {
        format!(
            "Please provide at least {} characters describing your complaint",
            self.min_description_chars
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<FieldName, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

/// Check a draft against `FIELD_RULES`. At most one message per field.
pub fn validate(draft: &ComplaintDraft, rules: &FieldRules) -> ValidationReport {
    let mut report = ValidationReport::default();
    for field_rule in FIELD_RULES {
        if report.errors.contains_key(&field_rule.field) {
            continue;
        }
        let value = draft.field(field_rule.field).to_string();
        let passes = match field_rule.rule {
            Rule::Required => !value.trim().is_empty(),
            Rule::Email    => is_email(&value),
            Rule::MinChars => value.validate_length(
                Some(rules.min_description_chars as u64),
                None,
                None,
            ),
        };
        if !passes {
            let message = match field_rule.rule {
                Rule::MinChars => rules.min_chars_message(),
                _ => field_rule.message.to_string(),
            };
            report.errors.insert(field_rule.field, message);
        }
    }
    report
}

/// `validator`'s syntax check, narrowed to addresses with a real-looking
/// domain. Leading dots and `..` runs are refused separately.
fn is_email(value: &str) -> bool {
    value.validate_email()
        && !value.starts_with('.')
        && !value.contains("..")
        && EMAIL_RE.is_match(value)
}

/// The "N/200 minimum" counter under the description box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptionProgress {
    pub chars:   usize,
    pub minimum: usize,
}

impl DescriptionProgress {
    pub fn of(draft: &ComplaintDraft, rules: &FieldRules) -> Self {
        Self {
            chars:   draft.description_chars(),
            minimum: rules.min_description_chars,
        }
    }

    pub fn is_met(&self) -> bool {
        self.chars >= self.minimum
    }

    pub fn label(&self) -> String {
        format!("{}/{} minimum", self.chars, self.minimum)
    }
}
