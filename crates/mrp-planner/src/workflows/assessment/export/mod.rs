//! Document rendering and mail delivery for finished assessments.

pub mod document;
pub mod mail;
pub mod pipeline;

pub use document::{DocumentRenderer, RenderError, DOCX_CONTENT_TYPE};
pub use mail::{MailAttachment, MailDispatcher, MailError, MailMessage};
pub use pipeline::{document_filename, email_subject, ExportError, ExportPipeline, ExportedDocument};
