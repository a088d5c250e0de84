//! Output events: everything a session tells its front end.
//!
//! RULE: Every state change a user can observe is announced by exactly
//! one FormEvent. A front end may rebuild its view from the event stream
//! or ask the session for a fresh snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    attachments::{AttachmentSummary, RejectedFile},
    types::{LocalId, TicketNumber},
    validation::FieldName,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    SessionStarted {
        session_id: String,
    },
    FieldChanged {
        field: FieldName,
    },
    FieldErrors {
        errors: BTreeMap<FieldName, String>,
    },
    AttachmentsChanged {
        attachments: Vec<AttachmentSummary>,
    },
    AttachmentsRejected {
        rejected: Vec<RejectedFile>,
    },
    AttachmentRemoved {
        local_id: LocalId,
    },
    ChallengeRefreshed,
    ChallengeVerified,
    ChallengeMismatch {
        message: String,
    },
    SubmissionGated {
        reason: GateReason,
        message: String,
    },
    SubmissionStarted,
    SubmissionSucceeded {
        ticket_number: TicketNumber,
        submitted_at: DateTime<Utc>,
    },
    HelpToggled {
        show_help: bool,
    },
    SessionReset,
}

/// Which gating precondition failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    ChallengeNotVerified,
    InvalidFields,
}

impl FormEvent {
    /// Stable name for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }      => "session_started",
            Self::FieldChanged { .. }        => "field_changed",
            Self::FieldErrors { .. }         => "field_errors",
            Self::AttachmentsChanged { .. }  => "attachments_changed",
            Self::AttachmentsRejected { .. } => "attachments_rejected",
            Self::AttachmentRemoved { .. }   => "attachment_removed",
            Self::ChallengeRefreshed         => "challenge_refreshed",
            Self::ChallengeVerified          => "challenge_verified",
            Self::ChallengeMismatch { .. }   => "challenge_mismatch",
            Self::SubmissionGated { .. }     => "submission_gated",
            Self::SubmissionStarted          => "submission_started",
            Self::SubmissionSucceeded { .. } => "submission_succeeded",
            Self::HelpToggled { .. }         => "help_toggled",
            Self::SessionReset               => "session_reset",
        }
    }
}
