//! Session-facing service shared by the HTTP router, the demo, and tests.
//!
//! One service owns one session behind a mutex; user actions are discrete
//! and quick, so a plain lock around the whole operation keeps every
//! mutation serialized.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ExportConfig, GateConfig};

use super::catalog::{SeverityOptions, ShapeKind};
use super::domain::{Answer, AnswerValue, MissionDetails, RiskCategory, RiskSeverity};
use super::export::{
    DocumentRenderer, ExportError, ExportPipeline, ExportedDocument, MailDispatcher,
};
use super::navigation::{NavigationError, QuestionStepStatus, StepPosition};
use super::scoring::ScoreReport;
use super::session::{AssessmentError, AssessmentSession};

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything the questionnaire UI needs to draw the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub position: StepPosition,
    pub current_step: usize,
    pub total_steps: usize,
    pub progress: f64,
    pub can_go_back: bool,
    pub category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub question_statuses: Vec<QuestionStepStatus>,
    pub mission: MissionDetails,
    pub comments: String,
    pub scores: ScoreReport,
    pub locked: bool,
}

/// The question currently on screen, with any prior answer for re-editing.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub id: &'static str,
    pub prompt: &'static str,
    pub category: &'static str,
    pub shape: ShapeKind,
    pub options: SeverityOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

/// Service composing the session, export pipeline, and session gate.
pub struct AssessmentService<D, M> {
    session: Mutex<AssessmentSession>,
    pipeline: ExportPipeline<D, M>,
    gate: GateConfig,
}

impl<D, M> AssessmentService<D, M>
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    pub fn new(renderer: Arc<D>, mailer: Arc<M>, gate: GateConfig, export: ExportConfig) -> Self {
        Self {
            session: Mutex::new(AssessmentSession::standard()),
            pipeline: ExportPipeline::new(renderer, mailer, export),
            gate,
        }
    }

    /// Checks the static credential pair. Deny carries no lockout.
    pub fn login(&self, username: &str, password: &str) -> bool {
        let allowed = self.gate.verify(username, password);
        if allowed {
            info!(%username, "session gate passed");
        } else {
            warn!(%username, "session gate denied");
        }
        allowed
    }

    pub fn view(&self) -> AssessmentView {
        build_view(&self.lock_session())
    }

    pub fn begin(&self) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.begin()?;
        info!("assessment started");
        Ok(build_view(&session))
    }

    pub fn submit_mission_details(
        &self,
        details: MissionDetails,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.submit_mission_details(details)?;
        info!(callsign = %session.mission().callsign, "mission details recorded");
        Ok(build_view(&session))
    }

    pub fn submit_answer(
        &self,
        value: AnswerValue,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        let question = session.submit_answer(value)?;
        info!(question, "answer recorded");
        Ok(build_view(&session))
    }

    pub fn skip_current(&self) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        let question = session.skip_current()?;
        info!(question, "question skipped");
        Ok(build_view(&session))
    }

    pub fn go_back(&self) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.go_back()?;
        Ok(build_view(&session))
    }

    /// Jumps to a previously visited question. A jump to a still-locked
    /// step is dropped and the unchanged state returned.
    pub fn jump_to_question(
        &self,
        target: usize,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        match session.jump_to_question(target) {
            Ok(()) => Ok(build_view(&session)),
            Err(AssessmentError::Navigation(NavigationError::LockedStep { index })) => {
                debug!(index, "jump to locked step rejected");
                Ok(build_view(&session))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn return_to_questions(&self) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.return_to_questions()?;
        Ok(build_view(&session))
    }

    pub fn set_override(
        &self,
        id: &str,
        severity: Option<RiskSeverity>,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.set_override(id, severity)?;
        info!(question = id, overridden = severity.is_some(), "override updated");
        Ok(build_view(&session))
    }

    pub fn set_comments(&self, comments: String) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        session.set_comments(comments)?;
        Ok(build_view(&session))
    }

    /// Locks the assessment. The first confirmation dispatches the one-time
    /// review notification; if that dispatch fails the session stays
    /// unlocked and the confirmation can simply be retried. Confirming an
    /// already locked assessment is a no-op.
    pub fn confirm_lock(&self) -> Result<AssessmentView, AssessmentServiceError> {
        let mut session = self.lock_session();
        if session.is_locked() {
            return Ok(build_view(&session));
        }
        if !session.review_notified() {
            let fields = session.projected_fields();
            match self.pipeline.notify_reviewer(session.mission(), &fields) {
                Ok(()) => {
                    session.mark_review_notified();
                    info!(
                        recipient = %self.pipeline.config().review_recipient,
                        "review notification dispatched"
                    );
                }
                Err(err) => {
                    warn!(error = %err, "review notification failed, assessment stays unlocked");
                    return Err(err.into());
                }
            }
        }
        session.lock();
        info!("assessment locked");
        Ok(build_view(&session))
    }

    /// Renders the current state into a downloadable document.
    pub fn export_document(&self) -> Result<ExportedDocument, AssessmentServiceError> {
        let session = self.lock_session();
        let fields = session.projected_fields();
        match self.pipeline.render_document(session.mission(), &fields) {
            Ok(document) => {
                info!(filename = %document.filename, "assessment document rendered");
                Ok(document)
            }
            Err(err) => {
                warn!(error = %err, "document export failed");
                Err(err.into())
            }
        }
    }

    /// Renders and mails the current state to caller-supplied recipients.
    pub fn send_email(&self, recipients: Vec<String>) -> Result<(), AssessmentServiceError> {
        let session = self.lock_session();
        let fields = session.projected_fields();
        let requested = recipients.len();
        match self.pipeline.send_to(recipients, session.mission(), &fields) {
            Ok(()) => {
                info!(requested, "assessment emailed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "assessment email failed");
                Err(err.into())
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, AssessmentSession> {
        self.session.lock().expect("session mutex poisoned")
    }
}

fn build_view(session: &AssessmentSession) -> AssessmentView {
    let navigation = session.navigation();
    let question = navigation.current_question_index().and_then(|index| {
        session.catalog().question(index).map(|template| QuestionView {
            index,
            id: template.id,
            prompt: template.prompt,
            category: template.category.label(),
            shape: template.shape.kind(),
            options: template.options,
            answer: session.answer(template.id).cloned(),
        })
    });

    AssessmentView {
        position: navigation.position(),
        current_step: navigation.current_step(),
        total_steps: navigation.total_steps(),
        progress: navigation.progress(),
        can_go_back: navigation.can_go_back(),
        category: navigation.current_category().map(RiskCategory::label),
        question,
        question_statuses: navigation.question_statuses(),
        mission: session.mission().clone(),
        comments: session.comments().to_string(),
        scores: session.scores(),
        locked: session.is_locked(),
    }
}
