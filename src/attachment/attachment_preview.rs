use serde::Serialize;

use super::attachment_models::{Attachment, AttachmentKind};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with base 1024, at most two decimals, trailing
/// zeros trimmed: `0 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

impl AttachmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Pdf => "PDF",
            AttachmentKind::Image => "Image",
            AttachmentKind::Video => "Video",
            AttachmentKind::Unknown => "File",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AttachmentKind::Pdf | AttachmentKind::Unknown => "file-text",
            AttachmentKind::Image => "image",
            AttachmentKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Preview {
    InlineImage { src: String, alt: String },
    VideoPlayer { src: String, mime_type: String },
    DownloadLink { href: String, label: String, size: String },
}

pub fn preview(attachment: &Attachment) -> Preview {
    let href = attachment.content_ref.href().to_string();
    match attachment.kind {
        AttachmentKind::Image => Preview::InlineImage {
            src: href,
            alt: attachment.name.clone(),
        },
        AttachmentKind::Video => Preview::VideoPlayer {
            src: href,
            mime_type: attachment.mime_type.clone(),
        },
        AttachmentKind::Pdf | AttachmentKind::Unknown => Preview::DownloadLink {
            href,
            label: attachment.name.clone(),
            size: format_file_size(attachment.size),
        },
    }
}
