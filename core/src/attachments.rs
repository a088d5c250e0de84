//! Attachment tracker: the ordered list of files picked for a complaint.
//!
//! Files that are too large or of an unsupported type never enter the
//! list. They are reported back to the caller in `AddOutcome::rejected`
//! so a front end may surface them, but nothing else happens to them.

use serde::{Deserialize, Serialize};
use uuid::Builder;

use crate::{
    config::{AllowedFileType, FormConfig},
    rng::FormRng,
    types::LocalId,
};

/// What a file picker hands in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileCandidate {
    pub name:       String,
    pub size_bytes: u64,
    #[serde(default)]
    pub mime_type:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub local_id:   LocalId,
    pub name:       String,
    pub size_bytes: u64,
    pub mime_type:  String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooLarge,
    UnsupportedType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedFile {
    pub name:   String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddOutcome {
    pub accepted: Vec<Attachment>,
    pub rejected: Vec<RejectedFile>,
}

/// Icon family used by the file list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentSummary {
    pub local_id:   LocalId,
    pub name:       String,
    pub size_label: String,
    pub kind:       AttachmentKind,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        if self.mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else if self.mime_type == "application/pdf" {
            AttachmentKind::Pdf
        } else {
            AttachmentKind::Document
        }
    }

    pub fn summary(&self) -> AttachmentSummary {
        AttachmentSummary {
            local_id:   self.local_id.clone(),
            name:       self.name.clone(),
            size_label: format_file_size(self.size_bytes),
            kind:       self.kind(),
        }
    }
}

pub struct AttachmentTracker {
    items:         Vec<Attachment>,
    allowed_types: Vec<AllowedFileType>,
    max_bytes:     u64,
}

impl AttachmentTracker {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            items:         Vec::new(),
            allowed_types: config.allowed_file_types.clone(),
            max_bytes:     config.max_attachment_bytes,
        }
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append every acceptable candidate, in input order.
    pub fn add(&mut self, files: Vec<FileCandidate>, rng: &mut FormRng) -> AddOutcome {
        let mut outcome = AddOutcome::default();
        for file in files {
            if file.size_bytes > self.max_bytes {
                log::debug!("Filtered {} ({} bytes): too large", file.name, file.size_bytes);
                outcome.rejected.push(RejectedFile { name: file.name, reason: RejectReason::TooLarge });
                continue;
            }
            let Some(mime_type) = self.resolve_mime(&file) else {
                log::debug!("Filtered {} ({:?}): unsupported type", file.name, file.mime_type);
                outcome.rejected.push(RejectedFile { name: file.name, reason: RejectReason::UnsupportedType });
                continue;
            };
            let attachment = Attachment {
                local_id:   new_local_id(rng),
                name:       file.name,
                size_bytes: file.size_bytes,
                mime_type,
            };
            self.items.push(attachment.clone());
            outcome.accepted.push(attachment);
        }
        outcome
    }

    /// Drop one entry. Returns false when the id is unknown.
    pub fn remove(&mut self, local_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.local_id != local_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn summaries(&self) -> Vec<AttachmentSummary> {
        self.items.iter().map(Attachment::summary).collect()
    }

    /// Match the declared MIME type against the allowed set, then the
    /// extension. Either match stores the canonical allowed MIME type.
    fn resolve_mime(&self, file: &FileCandidate) -> Option<String> {
        let by_mime = self
            .allowed_types
            .iter()
            .find(|t| !file.mime_type.is_empty() && t.mime_type.eq_ignore_ascii_case(&file.mime_type));
        if let Some(allowed) = by_mime {
            return Some(allowed.mime_type.clone());
        }
        let ext = extension_of(&file.name)?;
        self.allowed_types
            .iter()
            .find(|t| t.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .map(|t| t.mime_type.clone())
    }
}

fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    Some(name[idx..].to_string())
}

/// Random v4-shaped UUID drawn from the session stream.
fn new_local_id(rng: &mut FormRng) -> LocalId {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// Human-readable size: "0 Bytes", "512 Bytes", "1.5 KB", "10 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{scaled:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
