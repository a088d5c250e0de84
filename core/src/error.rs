use thiserror::Error;

use crate::validation::ValidationReport;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Please complete the security verification first")]
    ChallengeNotVerified,

    #[error("{} field(s) need attention", .0.errors.len())]
    InvalidFields(ValidationReport),

    #[error("Verification code does not match. Please try again.")]
    ChallengeMismatch,

    #[error("Enter the verification code before verifying")]
    EmptyChallengeInput,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("This complaint has already been submitted")]
    AlreadySubmitted,

    #[error("No submitted complaint to reset")]
    NothingToReset,

    #[error("No submission is in progress")]
    NotSubmitting,

    #[error("Attachment '{local_id}' not found")]
    UnknownAttachment { local_id: String },

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FormError {
    /// Gating rejections are recoverable by the user; everything else is
    /// a caller or environment problem.
    pub fn is_gating(&self) -> bool {
        matches!(
            self,
            Self::ChallengeNotVerified | Self::InvalidFields(_) | Self::ChallengeMismatch
        )
    }
}

pub type FormResult<T> = Result<T, FormError>;
