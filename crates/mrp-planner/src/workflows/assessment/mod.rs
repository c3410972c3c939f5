//! Mission risk profile assessment workflow.
//!
//! Walks a crew through the compiled-in question catalog, keeps a live
//! risk score for both seats, and exports the finished profile as a
//! document download or an emailed attachment.

pub mod catalog;
pub mod domain;
pub mod export;
pub mod navigation;
pub mod projection;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{
    AnswerShape, CustomWiring, QuestionCatalog, QuestionTemplate, SeverityOptions, ShapeKind,
};
pub use domain::{
    Answer, AnswerDisposition, AnswerValue, CustomHazard, HazardSlot, MdaLevel, MissionDetails,
    RiskCategory, RiskSeverity,
};
pub use export::{
    document_filename, email_subject, DocumentRenderer, ExportError, ExportPipeline,
    ExportedDocument, MailAttachment, MailDispatcher, MailError, MailMessage, RenderError,
    DOCX_CONTENT_TYPE,
};
pub use navigation::{NavigationError, NavigationState, QuestionStepStatus, StepPosition};
pub use projection::project;
pub use router::assessment_router;
pub use scoring::{compute_scores, ScoreReport};
pub use service::{AssessmentService, AssessmentServiceError, AssessmentView, QuestionView};
pub use session::{AssessmentError, AssessmentSession};
