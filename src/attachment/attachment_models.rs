use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard upper bound on a single attachment: 10 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 9] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/wmv",
];

pub fn is_allowed_mime(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Video,
    Pdf,
    Unknown,
}

impl AttachmentKind {
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type {
            "application/pdf" => AttachmentKind::Pdf,
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" => AttachmentKind::Image,
            "video/mp4" | "video/avi" | "video/mov" | "video/wmv" => AttachmentKind::Video,
            _ => AttachmentKind::Unknown,
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an attachment's bytes can be resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "href", rename_all = "snake_case")]
pub enum ContentRef {
    /// Durable URL handed back by a storage backend.
    Remote(String),
    /// Temporary object reference, only valid for the current session.
    Local(String),
}

impl ContentRef {
    pub fn session_local() -> Self {
        ContentRef::Local(format!("blob:session/{}", Uuid::new_v4()))
    }

    pub fn href(&self) -> &str {
        match self {
            ContentRef::Remote(href) | ContentRef::Local(href) => href,
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, ContentRef::Remote(_))
    }
}

/// A file as handed over by the picker, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(default)]
    pub content_ref: Option<ContentRef>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            content_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub kind: AttachmentKind,
    pub content_ref: ContentRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(AttachmentKind::from_mime("application/pdf"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_mime("image/jpg"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_mime("image/gif"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_mime("video/wmv"), AttachmentKind::Video);
        assert_eq!(AttachmentKind::from_mime("video/x-matroska"), AttachmentKind::Unknown);
        assert_eq!(AttachmentKind::from_mime("text/plain"), AttachmentKind::Unknown);
    }

    #[test]
    fn test_every_allowed_mime_has_a_known_kind() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(is_allowed_mime(mime));
            assert_ne!(AttachmentKind::from_mime(mime), AttachmentKind::Unknown);
        }
        assert!(!is_allowed_mime("image/webp"));
        assert!(!is_allowed_mime("IMAGE/PNG"));
    }

    #[test]
    fn test_session_local_refs_are_unique_and_not_durable() {
        let a = ContentRef::session_local();
        let b = ContentRef::session_local();
        assert_ne!(a, b);
        assert!(a.href().starts_with("blob:session/"));
        assert!(!a.is_durable());
        assert!(ContentRef::Remote("https://cdn.example.com/a.png".into()).is_durable());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AttachmentKind::Pdf.to_string(), "PDF");
        assert_eq!(AttachmentKind::Image.to_string(), "Image");
        assert_eq!(AttachmentKind::Video.to_string(), "Video");
        assert_eq!(AttachmentKind::Unknown.to_string(), "File");
    }
}
