//! Render-and-send orchestration for completed assessments.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::config::ExportConfig;
use crate::workflows::assessment::domain::MissionDetails;

use super::document::{DocumentRenderer, RenderError, DOCX_CONTENT_TYPE};
use super::mail::{MailAttachment, MailDispatcher, MailError, MailMessage};

/// Rendered document plus the metadata download and mail surfaces need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Error raised by the export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("at least one recipient is required")]
    NoRecipients,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Composes the renderer and mail dispatcher behind one call site.
pub struct ExportPipeline<D, M> {
    renderer: Arc<D>,
    mailer: Arc<M>,
    config: ExportConfig,
}

impl<D, M> ExportPipeline<D, M>
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    pub fn new(renderer: Arc<D>, mailer: Arc<M>, config: ExportConfig) -> Self {
        Self {
            renderer,
            mailer,
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Renders the projected fields into a downloadable document.
    pub fn render_document(
        &self,
        mission: &MissionDetails,
        fields: &BTreeMap<String, String>,
    ) -> Result<ExportedDocument, ExportError> {
        let bytes = self.renderer.render(fields)?;
        Ok(ExportedDocument {
            filename: document_filename(mission),
            content_type: DOCX_CONTENT_TYPE,
            bytes,
        })
    }

    /// Renders and mails the assessment. Blank recipients are dropped and an
    /// effectively empty list is rejected before any rendering happens.
    pub fn send_to(
        &self,
        recipients: Vec<String>,
        mission: &MissionDetails,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), ExportError> {
        let recipients: Vec<String> = recipients
            .into_iter()
            .filter(|recipient| !recipient.trim().is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(ExportError::NoRecipients);
        }

        let document = self.render_document(mission, fields)?;
        let message = MailMessage {
            sender: self.config.sender.clone(),
            recipients,
            subject: email_subject(mission),
            html_body: email_body(mission),
            attachment: MailAttachment {
                filename: document.filename,
                content_type: document.content_type.to_string(),
                bytes: document.bytes,
            },
        };
        self.mailer.dispatch(message)?;
        Ok(())
    }

    /// One-recipient send to the configured review address.
    pub fn notify_reviewer(
        &self,
        mission: &MissionDetails,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), ExportError> {
        self.send_to(
            vec![self.config.review_recipient.clone()],
            mission,
            fields,
        )
    }
}

pub fn document_filename(mission: &MissionDetails) -> String {
    format!(
        "MRP_{}_{}.docx",
        mission.callsign,
        resolve_date(&mission.date_time).format("%Y-%m-%d")
    )
}

pub fn email_subject(mission: &MissionDetails) -> String {
    format!(
        "Mission Risk Profile - {} - {} - {}",
        mission.callsign,
        mission.lesson,
        resolve_date(&mission.date_time).format("%Y-%m-%d")
    )
}

fn email_body(mission: &MissionDetails) -> String {
    let mut html = String::new();
    writeln!(html, "<h2>Mission Risk Profile</h2>").expect("write heading");
    writeln!(html, "<p>Callsign: {}</p>", escape_html(&mission.callsign)).expect("write callsign");
    writeln!(html, "<p>PIC: {}</p>", escape_html(&mission.pic_name)).expect("write pic");
    writeln!(html, "<p>CP: {}</p>", escape_html(&mission.cp_name)).expect("write cp");
    writeln!(html, "<p>Lesson: {}</p>", escape_html(&mission.lesson)).expect("write lesson");
    writeln!(
        html,
        "<p>Date/Time: {}</p>",
        escape_html(&mission.date_time)
    )
    .expect("write date");
    writeln!(html, "<p>The completed risk profile is attached.</p>").expect("write note");
    html
}

/// Mission dates arrive as free text from the briefing form. Known formats
/// are tried in order; anything else falls back to today's local date.
fn resolve_date(raw: &str) -> NaiveDate {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.date_naive();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return parsed.date();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return parsed;
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%d %B %Y") {
        return parsed;
    }
    Local::now().date_naive()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
