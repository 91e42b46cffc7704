use thiserror::Error;
use tracing::{debug, warn};

use super::attachment_models::{is_allowed_mime, AttachmentKind, RawFile, MAX_ATTACHMENT_BYTES};
use super::attachment_preview::format_file_size;
use crate::notification::{Notice, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("file exceeds the size limit")]
    TooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub reason: RejectionReason,
    limit: u64,
}

impl Rejection {
    pub fn notice(&self) -> Notice {
        match self.reason {
            RejectionReason::UnsupportedType => Notice::new(
                "Invalid file type",
                format!(
                    "{} is not a supported file type. Please select PDF, image, or video files.",
                    self.file_name
                ),
                Severity::Destructive,
            ),
            RejectionReason::TooLarge => Notice::new(
                "File too large",
                format!(
                    "{} is larger than {}. Please select a smaller file.",
                    self.file_name,
                    format_file_size(self.limit).replace(' ', "")
                ),
                Severity::Destructive,
            ),
        }
    }
}

/// A file that passed validation, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file: RawFile,
    pub kind: AttachmentKind,
}

#[derive(Debug, Default)]
pub struct SelectionReport {
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
}

impl SelectionReport {
    /// Whether the batch replaced the pending selection.
    pub fn replaced(&self) -> bool {
        self.accepted > 0
    }
}

/// Holds the pending attachment selection of a draft.
///
/// Each accepted batch replaces the previous selection wholesale. A batch in
/// which nothing is accepted leaves the previous selection untouched.
#[derive(Debug, Clone)]
pub struct AttachmentValidator {
    max_bytes: u64,
    pending: Vec<PendingFile>,
}

impl AttachmentValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes: max_bytes.min(MAX_ATTACHMENT_BYTES),
            pending: Vec::new(),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Type is checked before size; only the first failure is reported.
    pub fn check(&self, file: &RawFile) -> Result<AttachmentKind, RejectionReason> {
        if !is_allowed_mime(&file.mime_type) {
            return Err(RejectionReason::UnsupportedType);
        }
        if file.size > self.max_bytes {
            return Err(RejectionReason::TooLarge);
        }
        Ok(AttachmentKind::from_mime(&file.mime_type))
    }

    pub fn select(&mut self, batch: Vec<RawFile>) -> SelectionReport {
        let mut valid = Vec::with_capacity(batch.len());
        let mut rejections = Vec::new();

        for file in batch {
            match self.check(&file) {
                Ok(kind) => valid.push(PendingFile { file, kind }),
                Err(reason) => {
                    warn!(file = %file.name, mime = %file.mime_type, size = file.size, %reason, "Attachment rejected");
                    rejections.push(Rejection {
                        file_name: file.name,
                        reason,
                        limit: self.max_bytes,
                    });
                }
            }
        }

        let accepted = valid.len();
        if accepted > 0 {
            self.pending = valid;
        } else {
            debug!("No valid files in batch, keeping previous selection");
        }

        SelectionReport {
            accepted,
            rejections,
        }
    }

    /// Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn take(&mut self) -> Vec<PendingFile> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for AttachmentValidator {
    fn default() -> Self {
        Self::new(MAX_ATTACHMENT_BYTES)
    }
}
