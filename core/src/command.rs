use serde::{Deserialize, Serialize};

use crate::{attachments::FileCandidate, types::LocalId, validation::FieldName};

/// Every input event a front end can send to a form session.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum FormCommand {
    // ── Draft ─────────────────────────────────────
    SetField {
        field: FieldName,
        value: String,
    },

    // ── Attachments ───────────────────────────────
    AddFiles {
        files: Vec<FileCandidate>,
    },
    RemoveFile {
        local_id: LocalId,
    },

    // ── Verification ──────────────────────────────
    SetChallengeInput {
        value: String,
    },
    VerifyChallenge,
    RefreshChallenge,

    // ── Submission ────────────────────────────────
    Submit,
    /// Secondary submit button inside the verification box.
    DirectSubmit,
    NewComplaint,
    ToggleHelp,
}

impl FormCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetField { .. }          => "set_field",
            Self::AddFiles { .. }          => "add_files",
            Self::RemoveFile { .. }        => "remove_file",
            Self::SetChallengeInput { .. } => "set_challenge_input",
            Self::VerifyChallenge          => "verify_challenge",
            Self::RefreshChallenge         => "refresh_challenge",
            Self::Submit                   => "submit",
            Self::DirectSubmit             => "direct_submit",
            Self::NewComplaint             => "new_complaint",
            Self::ToggleHelp               => "toggle_help",
        }
    }
}
