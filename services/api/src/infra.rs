use metrics_exporter_prometheus::PrometheusHandle;
use mrp_planner::workflows::assessment::{
    DocumentRenderer, MailDispatcher, MailError, MailMessage, RenderError,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Renders the assessment by substituting `{key}` markers in a plain-text
/// template file with projected field values.
pub(crate) struct TemplateFileRenderer {
    template_path: PathBuf,
}

impl TemplateFileRenderer {
    pub(crate) fn new(template_path: PathBuf) -> Self {
        Self { template_path }
    }
}

impl DocumentRenderer for TemplateFileRenderer {
    fn render(&self, fields: &BTreeMap<String, String>) -> Result<Vec<u8>, RenderError> {
        let template = std::fs::read_to_string(&self.template_path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                RenderError::TemplateNotFound(self.template_path.display().to_string())
            } else {
                RenderError::Render(err.to_string())
            }
        })?;
        Ok(fill_template(&template, fields).into_bytes())
    }
}

/// Markers without a matching field are left in place so gaps stay visible
/// in the rendered output.
pub(crate) fn fill_template(template: &str, fields: &BTreeMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let marker = &rest[open..];
        match marker.find('}') {
            Some(close) => {
                let key = &marker[1..close];
                match fields.get(key) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&marker[..=close]),
                }
                rest = &marker[close + 1..];
            }
            None => {
                output.push_str(marker);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

/// Keeps outbound mail in memory and surfaces it through logs. The serve
/// path uses this until a squadron relay is configured.
#[derive(Default, Clone)]
pub(crate) struct RecordingMailDispatcher {
    messages: Arc<Mutex<Vec<MailMessage>>>,
}

impl MailDispatcher for RecordingMailDispatcher {
    fn dispatch(&self, message: MailMessage) -> Result<(), MailError> {
        info!(
            recipients = message.recipients.len(),
            subject = %message.subject,
            attachment = %message.attachment.filename,
            "outbound mail recorded"
        );
        let mut guard = self.messages.lock().expect("mail mutex poisoned");
        guard.push(message);
        Ok(())
    }
}

impl RecordingMailDispatcher {
    pub(crate) fn sent(&self) -> Vec<MailMessage> {
        self.messages.lock().expect("mail mutex poisoned").clone()
    }
}
