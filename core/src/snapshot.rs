//! Rendered session state handed to a front end.
//!
//! A snapshot is rebuilt on demand from the live session. It is a
//! read-only view: nothing in it feeds back into the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    attachments::AttachmentSummary,
    config::{FirmContact, FormConfig, ProcessStep},
    submission::{Phase, SubmissionResult},
    types::TicketNumber,
    validation::{ComplaintDraft, DescriptionProgress, FieldName},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub session_id:           String,
    pub phase:                Phase,
    pub draft:                ComplaintDraft,
    pub field_errors:         BTreeMap<FieldName, String>,
    pub description_progress: DescriptionProgress,
    pub attachments:          Vec<AttachmentSummary>,
    pub challenge:            ChallengeView,
    pub can_submit:           bool,
    pub busy:                 bool,
    pub submit_label:         String,
    pub banner:               Option<Banner>,
    pub show_help:            bool,
    pub confirmation:         Option<Confirmation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeView {
    pub code:       String,
    pub input:      String,
    pub verified:   bool,
    pub can_verify: bool,
    pub error:      Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub kind:   BannerKind,
    pub title:  String,
    pub detail: Option<String>,
}

impl Banner {
    pub fn submitted(acknowledgement_days: u32) -> Self {
        Self {
            kind:   BannerKind::Success,
            title:  "Complaint submitted successfully!".to_string(),
            detail: Some(format!(
                "You'll receive an acknowledgement within {acknowledgement_days} business days."
            )),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind:   BannerKind::Error,
            title:  message.into(),
            detail: None,
        }
    }
}

/// The confirmation screen shown after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Confirmation {
    pub ticket_number:      TicketNumber,
    pub submitted_at:       DateTime<Utc>,
    pub submitted_at_label: String,
    pub draft:              ComplaintDraft,
    pub attachments:        Vec<AttachmentSummary>,
    pub help:               HelpContent,
}

impl Confirmation {
    pub fn from_result(result: &SubmissionResult, config: &FormConfig) -> Self {
        Self {
            ticket_number:      result.ticket_number.clone(),
            submitted_at:       result.submitted_at,
            submitted_at_label: format_submitted_at(&result.submitted_at),
            draft:              result.draft.clone(),
            attachments:        result.attachments.iter().map(|a| a.summary()).collect(),
            help:               HelpContent::from_config(config),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelpContent {
    pub contact:              FirmContact,
    pub process_steps:        Vec<ProcessStep>,
    pub acknowledgement_days: u32,
}

impl HelpContent {
    pub fn from_config(config: &FormConfig) -> Self {
        Self {
            contact:              config.firm.clone(),
            process_steps:        config.process_steps.clone(),
            acknowledgement_days: config.acknowledgement_days,
        }
    }
}

/// "October 16, 2026 at 02:30 PM"
pub fn format_submitted_at(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %I:%M %p").to_string()
}
