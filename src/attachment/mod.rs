pub mod attachment_models;
pub mod attachment_preview;
pub mod attachment_validator;

pub use attachment_models::{
    is_allowed_mime, Attachment, AttachmentKind, ContentRef, RawFile, ALLOWED_MIME_TYPES,
    MAX_ATTACHMENT_BYTES,
};
pub use attachment_preview::{format_file_size, preview, Preview};
pub use attachment_validator::{
    AttachmentValidator, PendingFile, Rejection, RejectionReason, SelectionReport,
};
