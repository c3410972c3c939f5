use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerValue, MissionDetails, RiskSeverity};
use super::export::{DocumentRenderer, ExportError, MailDispatcher, RenderError};
use super::service::{AssessmentService, AssessmentServiceError, AssessmentView};
use super::session::AssessmentError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub question_id: String,
    #[serde(default)]
    pub severity: Option<RiskSeverity>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsRequest {
    pub comments: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub recipients: Vec<String>,
}

/// Router builder exposing the questionnaire over HTTP.
pub fn assessment_router<D, M>(service: Arc<AssessmentService<D, M>>) -> Router
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/session/login", post(login_handler::<D, M>))
        .route("/api/v1/assessment", get(view_handler::<D, M>))
        .route("/api/v1/assessment/begin", post(begin_handler::<D, M>))
        .route(
            "/api/v1/assessment/mission-details",
            post(mission_details_handler::<D, M>),
        )
        .route("/api/v1/assessment/answer", post(answer_handler::<D, M>))
        .route("/api/v1/assessment/skip", post(skip_handler::<D, M>))
        .route("/api/v1/assessment/back", post(back_handler::<D, M>))
        .route("/api/v1/assessment/jump", post(jump_handler::<D, M>))
        .route(
            "/api/v1/assessment/summary/back",
            post(summary_back_handler::<D, M>),
        )
        .route(
            "/api/v1/assessment/override",
            post(override_handler::<D, M>),
        )
        .route(
            "/api/v1/assessment/comments",
            post(comments_handler::<D, M>),
        )
        .route("/api/v1/assessment/lock", post(lock_handler::<D, M>))
        .route("/api/v1/assessment/export", post(export_handler::<D, M>))
        .route("/api/v1/assessment/email", post(email_handler::<D, M>))
        .with_state(service)
}

pub(crate) async fn login_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    if service.login(&request.username, &request.password) {
        (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response()
    } else {
        let payload = json!({
            "error": "invalid credentials",
        });
        (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
    }
}

pub(crate) async fn view_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    (StatusCode::OK, axum::Json(service.view())).into_response()
}

pub(crate) async fn begin_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.begin())
}

pub(crate) async fn mission_details_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(details): axum::Json<MissionDetails>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.submit_mission_details(details))
}

pub(crate) async fn answer_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(value): axum::Json<AnswerValue>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.submit_answer(value))
}

pub(crate) async fn skip_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.skip_current())
}

pub(crate) async fn back_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.go_back())
}

pub(crate) async fn jump_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(request): axum::Json<JumpRequest>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.jump_to_question(request.index))
}

pub(crate) async fn summary_back_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.return_to_questions())
}

pub(crate) async fn override_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.set_override(&request.question_id, request.severity))
}

pub(crate) async fn comments_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(request): axum::Json<CommentsRequest>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.set_comments(request.comments))
}

pub(crate) async fn lock_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    view_response(service.confirm_lock())
}

pub(crate) async fn export_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    match service.export_document() {
        Ok(document) => {
            let headers = [
                (header::CONTENT_TYPE, document.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.filename),
                ),
            ];
            (StatusCode::OK, headers, document.bytes).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn email_handler<D, M>(
    State(service): State<Arc<AssessmentService<D, M>>>,
    axum::Json(request): axum::Json<EmailRequest>,
) -> Response
where
    D: DocumentRenderer + 'static,
    M: MailDispatcher + 'static,
{
    match service.send_email(request.recipients) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "sent" }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn view_response(result: Result<AssessmentView, AssessmentServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Assessment(AssessmentError::SessionLocked) => StatusCode::CONFLICT,
        AssessmentServiceError::Assessment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Export(ExportError::NoRecipients) => StatusCode::BAD_REQUEST,
        AssessmentServiceError::Export(ExportError::Render(RenderError::TemplateNotFound(_))) => {
            StatusCode::NOT_FOUND
        }
        AssessmentServiceError::Export(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
