//! Submission coordinator: the gated Idle → Submitting → Succeeded machine.
//!
//! TRANSITIONS:
//!   Idle       --begin (verified AND fields valid)--> Submitting
//!   Submitting --complete (delay elapsed)-----------> Succeeded
//!   Succeeded  --reset (new complaint)--------------> Idle
//!
//! Gating failures leave the state untouched. There is no failure path
//! out of Submitting and no cancellation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    attachments::Attachment,
    clock::SubmissionClock,
    error::{FormError, FormResult},
    rng::FormRng,
    ticket::TicketGenerator,
    types::TicketNumber,
    validation::{ComplaintDraft, ValidationReport},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResult {
    pub ticket_number: TicketNumber,
    pub submitted_at:  DateTime<Utc>,
    pub draft:         ComplaintDraft,
    pub attachments:   Vec<Attachment>,
}

/// What was on the form when the gate opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub draft:       ComplaintDraft,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting(PendingSubmission),
    Succeeded(SubmissionResult),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
}

impl SubmissionState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle          => Phase::Idle,
            Self::Submitting(_) => Phase::Submitting,
            Self::Succeeded(_)  => Phase::Succeeded,
        }
    }
}

pub struct SubmissionCoordinator {
    state:         SubmissionState,
    ticket_prefix: String,
}

impl SubmissionCoordinator {
    pub fn new(ticket_prefix: impl Into<String>) -> Self {
        Self {
            state: SubmissionState::Idle,
            ticket_prefix: ticket_prefix.into(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Submit affordance is disabled and shows a busy label.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting(_))
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        match &self.state {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// A new submission may only start from Idle.
    pub fn ensure_idle(&self) -> FormResult<()> {
        match self.state {
            SubmissionState::Idle => Ok(()),
            SubmissionState::Submitting(_) => Err(FormError::SubmissionInFlight),
            SubmissionState::Succeeded(_) => Err(FormError::AlreadySubmitted),
        }
    }

    /// Check the gate and enter Submitting, capturing the form contents.
    ///
    /// Verification is checked before the fields, so an unverified form
    /// reports the verification message even when fields are also invalid.
    pub fn begin(
        &mut self,
        verified: bool,
        report: &ValidationReport,
        draft: &ComplaintDraft,
        attachments: &[Attachment],
    ) -> FormResult<()> {
        self.ensure_idle()?;
        if !verified {
            return Err(FormError::ChallengeNotVerified);
        }
        if !report.is_valid() {
            return Err(FormError::InvalidFields(report.clone()));
        }
        self.state = SubmissionState::Submitting(PendingSubmission {
            draft:       draft.clone(),
            attachments: attachments.to_vec(),
        });
        Ok(())
    }

    /// Leave Submitting: assign the ticket and timestamp.
    pub fn complete(
        &mut self,
        rng: &mut FormRng,
        clock: &dyn SubmissionClock,
    ) -> FormResult<&SubmissionResult> {
        let pending = match std::mem::replace(&mut self.state, SubmissionState::Idle) {
            SubmissionState::Submitting(pending) => pending,
            other => {
                self.state = other;
                return Err(FormError::NotSubmitting);
            }
        };
        self.state = SubmissionState::Succeeded(SubmissionResult {
            ticket_number: TicketGenerator::generate(rng, &self.ticket_prefix),
            submitted_at:  clock.now(),
            draft:         pending.draft,
            attachments:   pending.attachments,
        });
        self.result().ok_or(FormError::NotSubmitting)
    }

    /// Start a new complaint. Only valid after a successful submission.
    pub fn reset(&mut self) -> FormResult<SubmissionResult> {
        match std::mem::replace(&mut self.state, SubmissionState::Idle) {
            SubmissionState::Succeeded(result) => Ok(result),
            other => {
                self.state = other;
                Err(FormError::NothingToReset)
            }
        }
    }
}
