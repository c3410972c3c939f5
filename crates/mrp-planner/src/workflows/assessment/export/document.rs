use std::collections::BTreeMap;

/// MIME type the export surfaces report for generated documents.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Rendering abstraction so workflows and tests run without a real
/// template engine on disk.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, fields: &BTreeMap<String, String>) -> Result<Vec<u8>, RenderError>;
}

/// Error enumeration for renderer failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("template rendering failed: {0}")]
    Render(String),
}
