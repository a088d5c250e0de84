//! The form session: one complaint form's complete state.
//!
//! RULES:
//!   - All input arrives through `apply()` or the typed methods it wraps.
//!   - All randomness flows through the session's RngBank.
//!   - All waiting flows through the injected SubmissionClock.
//!   - Every observable change is announced as a FormEvent.
//!
//! State is owned by the session alone; nothing here is process-wide.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::{
    attachments::{AddOutcome, AttachmentTracker, FileCandidate},
    challenge::ChallengeBox,
    clock::{SubmissionClock, SystemClock},
    command::FormCommand,
    config::FormConfig,
    error::{FormError, FormResult},
    event::{FormEvent, GateReason},
    rng::{RngBank, RngSlot},
    snapshot::{Banner, ChallengeView, Confirmation, SessionSnapshot},
    submission::{Phase, SubmissionCoordinator, SubmissionResult},
    validation::{self, ComplaintDraft, DescriptionProgress, FieldName, FieldRules, ValidationReport},
};

/// Which button triggered a submit. Both share one validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPath {
    Main,
    Direct,
}

impl SubmitPath {
    fn name(&self) -> &'static str {
        match self {
            Self::Main   => "main",
            Self::Direct => "direct",
        }
    }
}

pub struct FormSession {
    session_id:  String,
    config:      FormConfig,
    rules:       FieldRules,
    rng_bank:    RngBank,
    clock:       Box<dyn SubmissionClock>,
    draft:       ComplaintDraft,
    attachments: AttachmentTracker,
    challenge:   ChallengeBox,
    coordinator: SubmissionCoordinator,
    field_errors: BTreeMap<FieldName, String>,
    /// Set by the first submit attempt; from then on edits re-validate.
    attempted:   bool,
    banner:      Option<Banner>,
    show_help:   bool,
    pending:     Vec<FormEvent>,
    log:         Vec<FormEvent>,
}

impl FormSession {
    /// Session with real time and the given seed.
    pub fn new(config: FormConfig, seed: u64) -> Self {
        Self::with_clock(config, seed, Box::new(SystemClock))
    }

    /// Session seeded from OS entropy.
    pub fn from_entropy(config: FormConfig) -> Self {
        Self::build(config, RngBank::from_entropy(), Box::new(SystemClock))
    }

    pub fn with_clock(config: FormConfig, seed: u64, clock: Box<dyn SubmissionClock>) -> Self {
        Self::build(config, RngBank::new(seed), clock)
    }

    fn build(config: FormConfig, mut rng_bank: RngBank, clock: Box<dyn SubmissionClock>) -> Self {
        let session_id = format!("session-{:016x}", rng_bank.master_seed());
        let challenge = ChallengeBox::new(rng_bank.for_slot(RngSlot::Challenge), config.challenge_length);
        let mut session = Self {
            rules:        FieldRules::from(&config),
            attachments:  AttachmentTracker::new(&config),
            coordinator:  SubmissionCoordinator::new(config.ticket_prefix.clone()),
            draft:        ComplaintDraft::default(),
            field_errors: BTreeMap::new(),
            attempted:    false,
            banner:       None,
            show_help:    false,
            pending:      Vec::new(),
            log:          Vec::new(),
            session_id,
            config,
            rng_bank,
            clock,
            challenge,
        };
        session.emit(FormEvent::SessionStarted { session_id: session.session_id.clone() });
        session
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn session_id(&self) -> &str { &self.session_id }
    pub fn config(&self) -> &FormConfig { &self.config }
    pub fn draft(&self) -> &ComplaintDraft { &self.draft }
    pub fn attachments(&self) -> &AttachmentTracker { &self.attachments }
    pub fn challenge(&self) -> &ChallengeBox { &self.challenge }
    pub fn phase(&self) -> Phase { self.coordinator.phase() }
    pub fn result(&self) -> Option<&SubmissionResult> { self.coordinator.result() }
    pub fn field_errors(&self) -> &BTreeMap<FieldName, String> { &self.field_errors }
    pub fn banner(&self) -> Option<&Banner> { self.banner.as_ref() }
    pub fn show_help(&self) -> bool { self.show_help }

    /// Every event emitted since the session started.
    pub fn events(&self) -> &[FormEvent] {
        &self.log
    }

    // ── Input events ───────────────────────────────────────────

    /// Apply one input event and return the events it produced.
    ///
    /// Gating rejections (unverified challenge, invalid fields, code
    /// mismatch) are ordinary outcomes: they come back as events, not
    /// errors. Errors are reserved for commands the UI should not have
    /// been able to send in the current state.
    pub fn apply(&mut self, command: FormCommand) -> FormResult<Vec<FormEvent>> {
        log::debug!("[{}] command {}", self.session_id, command.name());
        self.pending.clear();
        let outcome = match command {
            FormCommand::SetField { field, value } => {
                self.set_field(field, value);
                Ok(())
            }
            FormCommand::AddFiles { files } => {
                self.add_files(files);
                Ok(())
            }
            FormCommand::RemoveFile { local_id } => self.remove_file(&local_id),
            FormCommand::SetChallengeInput { value } => {
                self.set_challenge_input(value);
                Ok(())
            }
            FormCommand::VerifyChallenge => self.verify_challenge(),
            FormCommand::RefreshChallenge => {
                self.refresh_challenge();
                Ok(())
            }
            FormCommand::Submit => self.submit().map(|_| ()),
            FormCommand::DirectSubmit => self.direct_submit().map(|_| ()),
            FormCommand::NewComplaint => self.new_complaint(),
            FormCommand::ToggleHelp => {
                self.toggle_help();
                Ok(())
            }
        };
        match outcome {
            Ok(()) => Ok(self.take_pending()),
            Err(err) if err.is_gating() => Ok(self.take_pending()),
            Err(err) => {
                self.pending.clear();
                Err(err)
            }
        }
    }

    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        self.draft.set_field(field, value);
        self.emit(FormEvent::FieldChanged { field });
        if self.attempted {
            let report = self.validate();
            if report.errors != self.field_errors {
                self.field_errors = report.errors;
                self.emit(FormEvent::FieldErrors { errors: self.field_errors.clone() });
            }
        }
    }

    pub fn add_files(&mut self, files: Vec<FileCandidate>) -> AddOutcome {
        let outcome = self.attachments.add(files, self.rng_bank.for_slot(RngSlot::Attachment));
        if !outcome.rejected.is_empty() {
            log::info!(
                "[{}] {} file(s) filtered at selection",
                self.session_id,
                outcome.rejected.len()
            );
            self.emit(FormEvent::AttachmentsRejected { rejected: outcome.rejected.clone() });
        }
        if !outcome.accepted.is_empty() {
            self.emit(FormEvent::AttachmentsChanged { attachments: self.attachments.summaries() });
        }
        outcome
    }

    pub fn remove_file(&mut self, local_id: &str) -> FormResult<()> {
        if !self.attachments.remove(local_id) {
            return Err(FormError::UnknownAttachment { local_id: local_id.to_string() });
        }
        self.emit(FormEvent::AttachmentRemoved { local_id: local_id.to_string() });
        self.emit(FormEvent::AttachmentsChanged { attachments: self.attachments.summaries() });
        Ok(())
    }

    pub fn set_challenge_input(&mut self, value: impl Into<String>) {
        self.challenge.set_input(value);
    }

    pub fn verify_challenge(&mut self) -> FormResult<()> {
        match self.challenge.verify() {
            Ok(()) => {
                log::debug!("[{}] challenge verified", self.session_id);
                self.emit(FormEvent::ChallengeVerified);
                Ok(())
            }
            Err(FormError::ChallengeMismatch) => {
                self.emit(FormEvent::ChallengeMismatch {
                    message: FormError::ChallengeMismatch.to_string(),
                });
                Err(FormError::ChallengeMismatch)
            }
            Err(err) => Err(err),
        }
    }

    pub fn refresh_challenge(&mut self) {
        self.challenge.refresh(self.rng_bank.for_slot(RngSlot::Challenge));
        self.emit(FormEvent::ChallengeRefreshed);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.emit(FormEvent::HelpToggled { show_help: self.show_help });
    }

    // ── Submission ─────────────────────────────────────────────

    /// The single validation entry point for every submit path.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.draft, &self.rules)
    }

    /// Main submit button: gate, wait out the simulated delay, assign a
    /// ticket.
    pub fn submit(&mut self) -> FormResult<&SubmissionResult> {
        self.submit_via(SubmitPath::Main)
    }

    /// Secondary submit inside the verification box. Same gate, same
    /// rules as `submit()`.
    pub fn direct_submit(&mut self) -> FormResult<&SubmissionResult> {
        self.submit_via(SubmitPath::Direct)
    }

    pub fn submit_via(&mut self, path: SubmitPath) -> FormResult<&SubmissionResult> {
        let delay = self.begin_submit(path)?;
        self.clock.sleep(delay);
        self.finish_submit()
    }

    /// Check the gate and enter Submitting. Returns the delay the caller
    /// must wait before `finish_submit()`.
    ///
    /// Front ends that drive their own timer use this pair directly so the
    /// busy state is observable between the two calls.
    pub fn begin_submit(&mut self, path: SubmitPath) -> FormResult<Duration> {
        self.coordinator.ensure_idle()?;
        let report = self.validate();
        self.attempted = true;
        if report.errors != self.field_errors {
            self.field_errors = report.errors.clone();
            self.emit(FormEvent::FieldErrors { errors: self.field_errors.clone() });
        }

        let gate = self.coordinator.begin(
            self.challenge.is_verified(),
            &report,
            &self.draft,
            self.attachments.items(),
        );
        if let Err(err) = gate {
            let reason = match &err {
                FormError::ChallengeNotVerified => Some(GateReason::ChallengeNotVerified),
                FormError::InvalidFields(_) => Some(GateReason::InvalidFields),
                _ => None,
            };
            if let Some(reason) = reason {
                let message = err.to_string();
                log::info!("[{}] {} submit gated: {message}", self.session_id, path.name());
                self.banner = Some(Banner::error(message.clone()));
                self.emit(FormEvent::SubmissionGated { reason, message });
            }
            return Err(err);
        }

        self.banner = None;
        log::info!("[{}] {} submit accepted", self.session_id, path.name());
        self.emit(FormEvent::SubmissionStarted);
        Ok(self.config.submit_delay())
    }

    /// Simulated delay has elapsed: assign the ticket and show the
    /// confirmation.
    pub fn finish_submit(&mut self) -> FormResult<&SubmissionResult> {
        let (ticket_number, submitted_at) = {
            let result = self.coordinator.complete(
                self.rng_bank.for_slot(RngSlot::Ticket),
                &*self.clock,
            )?;
            (result.ticket_number.clone(), result.submitted_at)
        };
        log::info!("[{}] complaint submitted as {ticket_number}", self.session_id);
        self.banner = Some(Banner::submitted(self.config.acknowledgement_days));
        self.emit(FormEvent::SubmissionSucceeded { ticket_number, submitted_at });
        self.coordinator.result().ok_or(FormError::NotSubmitting)
    }

    /// Back to an empty form with a fresh challenge.
    pub fn new_complaint(&mut self) -> FormResult<()> {
        let previous = self.coordinator.reset()?;
        log::debug!("[{}] reset after {}", self.session_id, previous.ticket_number);
        self.draft = ComplaintDraft::default();
        self.attachments.clear();
        self.field_errors.clear();
        self.attempted = false;
        self.banner = None;
        self.show_help = false;
        self.challenge.refresh(self.rng_bank.for_slot(RngSlot::Challenge));
        self.emit(FormEvent::SessionReset);
        self.emit(FormEvent::ChallengeRefreshed);
        Ok(())
    }

    // ── Output ─────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        let busy = self.coordinator.is_busy();
        SessionSnapshot {
            session_id:           self.session_id.clone(),
            phase:                self.phase(),
            draft:                self.draft.clone(),
            field_errors:         self.field_errors.clone(),
            description_progress: DescriptionProgress::of(&self.draft, &self.rules),
            attachments:          self.attachments.summaries(),
            challenge: ChallengeView {
                code:       self.challenge.challenge().code.clone(),
                input:      self.challenge.input().to_string(),
                verified:   self.challenge.is_verified(),
                can_verify: self.challenge.can_verify(),
                error:      self.challenge.error().map(String::from),
            },
            can_submit:   self.challenge.is_verified() && self.phase() == Phase::Idle,
            busy,
            submit_label: if busy { "Submitting..." } else { "Submit Complaint" }.to_string(),
            banner:       self.banner.clone(),
            show_help:    self.show_help,
            confirmation: self
                .coordinator
                .result()
                .map(|r| Confirmation::from_result(r, &self.config)),
        }
    }

    fn emit(&mut self, event: FormEvent) {
        log::debug!("[{}] event {}", self.session_id, event.type_name());
        self.log.push(event.clone());
        self.pending.push(event);
    }

    fn take_pending(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.pending)
    }
}
