use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::{ExportConfig, GateConfig};
use crate::workflows::assessment::catalog::{AnswerShape, ShapeKind};
use crate::workflows::assessment::domain::{AnswerValue, MissionDetails, RiskSeverity};
use crate::workflows::assessment::export::{
    DocumentRenderer, MailDispatcher, MailError, MailMessage, RenderError,
};
use crate::workflows::assessment::session::AssessmentSession;
use crate::workflows::assessment::AssessmentService;

pub(super) fn mission() -> MissionDetails {
    MissionDetails {
        callsign: "DAGGER 11".to_string(),
        pic_name: "Maj Reyes".to_string(),
        cp_name: "Lt Cruz".to_string(),
        ac_nr: "N-042".to_string(),
        lesson: "Formation".to_string(),
        area_assignment: "Area 3".to_string(),
        date_time: "2026-03-14T09:30".to_string(),
    }
}

pub(super) fn gate_config() -> GateConfig {
    GateConfig {
        username: "wildcats".to_string(),
        password: "wildcats101".to_string(),
    }
}

pub(super) fn export_config() -> ExportConfig {
    ExportConfig {
        review_recipient: "safety-officer@example.org".to_string(),
        sender: "mrp-planner@example.org".to_string(),
        template_path: PathBuf::from("templates/mrp_template.txt"),
    }
}

pub(super) fn individual(pic: RiskSeverity, cp: RiskSeverity) -> AnswerValue {
    AnswerValue::Individual {
        pic: Some(pic),
        cp: Some(cp),
    }
}

pub(super) fn shared(severity: RiskSeverity) -> AnswerValue {
    AnswerValue::Shared {
        severity: Some(severity),
    }
}

pub(super) fn custom(description: &str, severity: RiskSeverity) -> AnswerValue {
    AnswerValue::Custom {
        description: description.to_string(),
        severity,
    }
}

pub(super) fn session_at_first_question() -> AssessmentSession {
    let mut session = AssessmentSession::standard();
    session.begin().expect("begin accepted");
    session
        .submit_mission_details(mission())
        .expect("mission details accepted");
    session
}

pub(super) fn submit_green(session: &mut AssessmentSession, shape: AnswerShape) {
    let value = match shape.kind() {
        ShapeKind::Individual => individual(RiskSeverity::Green, RiskSeverity::Green),
        ShapeKind::Shared => shared(RiskSeverity::Green),
        ShapeKind::Custom => custom("", RiskSeverity::Green),
    };
    session.submit_answer(value).expect("answer accepted");
}

/// Answers everything before the target question green and stops with the
/// target on screen.
pub(super) fn advance_to(session: &mut AssessmentSession, id: &str) {
    loop {
        let index = session
            .navigation()
            .current_question_index()
            .expect("on a question page");
        let question = *session.catalog().question(index).expect("question in range");
        if question.id == id {
            return;
        }
        submit_green(session, question.shape);
    }
}

/// Answers every remaining question green, landing on the summary.
pub(super) fn answer_remaining(session: &mut AssessmentSession) {
    while let Some(index) = session.navigation().current_question_index() {
        let shape = session
            .catalog()
            .question(index)
            .expect("question in range")
            .shape;
        submit_green(session, shape);
    }
}

pub(super) fn build_service() -> (
    Arc<AssessmentService<MemoryRenderer, MemoryMailer>>,
    Arc<MemoryRenderer>,
    Arc<MemoryMailer>,
) {
    let renderer = Arc::new(MemoryRenderer::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = Arc::new(AssessmentService::new(
        renderer.clone(),
        mailer.clone(),
        gate_config(),
        export_config(),
    ));
    (service, renderer, mailer)
}

/// Drives a fresh service through mission details and every question.
pub(super) fn drive_to_summary<D, M>(service: &AssessmentService<D, M>)
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    service.begin().expect("begin accepted");
    service
        .submit_mission_details(mission())
        .expect("mission details accepted");
    loop {
        let view = service.view();
        let Some(question) = view.question else {
            break;
        };
        let value = match question.shape {
            ShapeKind::Individual => individual(RiskSeverity::Green, RiskSeverity::Green),
            ShapeKind::Shared => shared(RiskSeverity::Green),
            ShapeKind::Custom => custom("", RiskSeverity::Green),
        };
        service.submit_answer(value).expect("answer accepted");
    }
}

#[derive(Default)]
pub(super) struct MemoryRenderer {
    calls: Mutex<Vec<BTreeMap<String, String>>>,
}

impl MemoryRenderer {
    pub(super) fn calls(&self) -> Vec<BTreeMap<String, String>> {
        self.calls.lock().expect("renderer mutex poisoned").clone()
    }
}

impl DocumentRenderer for MemoryRenderer {
    fn render(&self, fields: &BTreeMap<String, String>) -> Result<Vec<u8>, RenderError> {
        self.calls
            .lock()
            .expect("renderer mutex poisoned")
            .push(fields.clone());
        Ok(b"rendered-profile".to_vec())
    }
}

pub(super) struct MissingTemplateRenderer;

impl DocumentRenderer for MissingTemplateRenderer {
    fn render(&self, _fields: &BTreeMap<String, String>) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::TemplateNotFound(
            "templates/mrp_template.txt".to_string(),
        ))
    }
}

#[derive(Default)]
pub(super) struct MemoryMailer {
    messages: Mutex<Vec<MailMessage>>,
}

impl MemoryMailer {
    pub(super) fn messages(&self) -> Vec<MailMessage> {
        self.messages.lock().expect("mailer mutex poisoned").clone()
    }
}

impl MailDispatcher for MemoryMailer {
    fn dispatch(&self, message: MailMessage) -> Result<(), MailError> {
        self.messages
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(super) struct OfflineMailer;

impl MailDispatcher for OfflineMailer {
    fn dispatch(&self, _message: MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("relay offline".to_string()))
    }
}

/// Fails the first dispatch, then records like the memory mailer.
#[derive(Default)]
pub(super) struct FlakyMailer {
    attempts: Mutex<u32>,
    messages: Mutex<Vec<MailMessage>>,
}

impl FlakyMailer {
    pub(super) fn delivered(&self) -> Vec<MailMessage> {
        self.messages.lock().expect("mailer mutex poisoned").clone()
    }
}

impl MailDispatcher for FlakyMailer {
    fn dispatch(&self, message: MailMessage) -> Result<(), MailError> {
        let mut attempts = self.attempts.lock().expect("mailer mutex poisoned");
        *attempts += 1;
        if *attempts == 1 {
            return Err(MailError::Transport("relay offline".to_string()));
        }
        self.messages
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
