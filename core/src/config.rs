use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FormError, FormResult};

pub const DEFAULT_CHALLENGE_LENGTH: usize = 5;
pub const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 200;
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowedFileType {
    pub mime_type: String,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirmContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessStep {
    pub id: u32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub challenge_length: usize,
    pub min_description_chars: usize,
    pub max_attachment_bytes: u64,
    pub allowed_file_types: Vec<AllowedFileType>,
    pub submit_delay_ms: u64,
    pub ticket_prefix: String,
    pub acknowledgement_days: u32,
    pub firm: FirmContact,
    pub process_steps: Vec<ProcessStep>,
}

impl FormConfig {
    /// Load `<data_dir>/form.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = format!("{data_dir}/form.json");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {path}"))?;
        let config: FormConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing {path}"))?;
        config.validate(&path)?;
        log::info!(
            "Loaded form config from {path}: {} file types, {}ms submit delay",
            config.allowed_file_types.len(),
            config.submit_delay_ms
        );
        Ok(config)
    }

    /// Reject values the engine cannot honour. `origin` names the source
    /// in the error message.
    pub fn validate(&self, origin: &str) -> FormResult<()> {
        let fail = |reason: &str| FormError::Config {
            path: origin.to_string(),
            reason: reason.to_string(),
        };
        if self.challenge_length == 0 {
            return Err(fail("challenge_length must be > 0"));
        }
        if self.max_attachment_bytes == 0 {
            return Err(fail("max_attachment_bytes must be > 0"));
        }
        if self.allowed_file_types.is_empty() {
            return Err(fail("allowed_file_types must not be empty"));
        }
        if self.ticket_prefix.is_empty() {
            return Err(fail("ticket_prefix must not be empty"));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Zero-delay config for tests.
    pub fn default_test() -> Self {
        Self {
            submit_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        let file_type = |mime: &str, exts: &[&str]| AllowedFileType {
            mime_type: mime.to_string(),
            extensions: exts.iter().map(|e| e.to_string()).collect(),
        };
        let step = |id: u32, title: &str, description: &str| ProcessStep {
            id,
            title: title.to_string(),
            description: description.to_string(),
        };
        Self {
            challenge_length: DEFAULT_CHALLENGE_LENGTH,
            min_description_chars: DEFAULT_MIN_DESCRIPTION_CHARS,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            allowed_file_types: vec![
                file_type("image/jpeg", &[".jpg", ".jpeg"]),
                file_type("image/png", &[".png"]),
                file_type("image/gif", &[".gif"]),
                file_type("application/pdf", &[".pdf"]),
                file_type("application/msword", &[".doc"]),
                file_type(DOCX_MIME, &[".docx"]),
            ],
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            ticket_prefix: "SM-".to_string(),
            acknowledgement_days: 5,
            firm: FirmContact {
                name: "Sterling Mutuals Inc.".to_string(),
                email: "complaints@sterlingmutuals.com".to_string(),
                phone: "1-800-354-4956".to_string(),
                address_lines: vec![
                    "1090 University Ave. West, 2nd Floor".to_string(),
                    "Windsor, Ontario".to_string(),
                ],
            },
            process_steps: vec![
                step(1, "Initial Receipt", "Submission & acknowledgement within 5 business days"),
                step(2, "Investigation", "Thorough investigation by our Compliance team"),
                step(3, "Review Period", "Comprehensive review period up to 90 days"),
                step(4, "Resolution", "Detailed response with findings and recommendations"),
            ],
        }
    }
}
