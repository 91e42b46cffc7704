use crate::attachment::{AttachmentValidator, MAX_ATTACHMENT_BYTES};

/// Not-yet-sent compose state: text plus the pending attachment selection.
#[derive(Debug, Clone)]
pub struct Draft {
    pub text: String,
    pub attachments: AttachmentValidator,
}

impl Draft {
    pub fn new(max_attachment_bytes: u64) -> Self {
        Self {
            text: String::new(),
            attachments: AttachmentValidator::new(max_attachment_bytes),
        }
    }

    /// Whether the send affordance is enabled.
    pub fn can_send(&self) -> bool {
        send_enabled(&self.text, self.attachments.pending().len())
    }

    pub fn reset(&mut self) {
        self.text.clear();
        self.attachments.clear();
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new(MAX_ATTACHMENT_BYTES)
    }
}

pub fn send_enabled(text: &str, attachment_count: usize) -> bool {
    !text.trim().is_empty() || attachment_count > 0
}
