use serde::{Deserialize, Serialize};

/// Outbound message with the rendered assessment attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: MailAttachment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Trait describing the outbound mail hook (SMTP relay, provider API, or
/// the recording fake used by tests and the demo).
pub trait MailDispatcher: Send + Sync {
    fn dispatch(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
