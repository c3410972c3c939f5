use std::sync::Arc;

use super::common::*;
use crate::workflows::assessment::domain::RiskSeverity;
use crate::workflows::assessment::export::ExportError;
use crate::workflows::assessment::navigation::{QuestionStepStatus, StepPosition};
use crate::workflows::assessment::session::AssessmentError;
use crate::workflows::assessment::{AssessmentService, AssessmentServiceError};

#[test]
fn login_checks_the_static_gate() {
    let (service, _, _) = build_service();
    assert!(service.login("wildcats", "wildcats101"));
    assert!(!service.login("wildcats", "tigers"));
    assert!(!service.login("falcons", "wildcats101"));
}

#[test]
fn fresh_view_sits_on_the_welcome_screen() {
    let (service, _, _) = build_service();
    let view = service.view();
    assert_eq!(view.position, StepPosition::Welcome);
    assert_eq!(view.current_step, 0);
    assert_eq!(view.total_steps, 31);
    assert!(view.question.is_none());
    assert_eq!(view.question_statuses.len(), 29);
    assert!(!view.locked);
    assert_eq!(view.scores.pic_total, 0);
}

#[test]
fn begin_and_mission_details_reach_the_first_question() {
    let (service, _, _) = build_service();
    let view = service.begin().expect("begin accepted");
    assert_eq!(view.position, StepPosition::MissionDetails);

    let view = service
        .submit_mission_details(mission())
        .expect("mission details accepted");
    assert_eq!(view.position, StepPosition::Question { index: 0 });
    assert_eq!(view.mission.callsign, "DAGGER 11");
    assert_eq!(view.category, Some("Mission"));
    let question = view.question.expect("question on screen");
    assert_eq!(question.id, "short_notice");
    assert!(question.answer.is_none());
}

#[test]
fn submitted_answers_reflect_in_the_view() {
    let (service, _, _) = build_service();
    service.begin().expect("begin accepted");
    service
        .submit_mission_details(mission())
        .expect("mission details accepted");

    let view = service
        .submit_answer(individual(RiskSeverity::Yellow, RiskSeverity::Green))
        .expect("answer accepted");
    assert_eq!(view.scores.pic_total, 1);
    assert_eq!(view.scores.cp_total, 0);
    assert_eq!(view.question_statuses[0], QuestionStepStatus::Completed);
    assert_eq!(
        view.question.expect("next question").id,
        "unfamiliar_airfield"
    );

    let view = service.go_back().expect("back accepted");
    let question = view.question.expect("question on screen");
    let answer = question.answer.expect("prior record surfaced");
    assert!(answer.is_answered());
}

#[test]
fn jump_to_a_locked_step_returns_the_unchanged_view() {
    let (service, _, _) = build_service();
    service.begin().expect("begin accepted");
    service
        .submit_mission_details(mission())
        .expect("mission details accepted");

    let view = service.jump_to_question(5).expect("jump swallowed");
    assert_eq!(view.position, StepPosition::Question { index: 0 });

    match service.jump_to_question(99) {
        Err(AssessmentServiceError::Assessment(AssessmentError::Navigation(_))) => {}
        other => panic!("expected navigation error, got {other:?}"),
    }
}

#[test]
fn confirm_lock_notifies_the_reviewer_exactly_once() {
    let (service, _, mailer) = build_service();
    drive_to_summary(service.as_ref());

    let view = service.confirm_lock().expect("lock accepted");
    assert!(view.locked);
    let messages = mailer.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].recipients,
        vec!["safety-officer@example.org".to_string()]
    );

    let view = service.confirm_lock().expect("second confirm is a no-op");
    assert!(view.locked);
    assert_eq!(mailer.messages().len(), 1);
}

#[test]
fn failed_notification_keeps_the_session_unlocked() {
    let service = AssessmentService::new(
        Arc::new(MemoryRenderer::default()),
        Arc::new(OfflineMailer),
        gate_config(),
        export_config(),
    );
    drive_to_summary(&service);

    match service.confirm_lock() {
        Err(AssessmentServiceError::Export(ExportError::Mail(_))) => {}
        other => panic!("expected mail failure, got {other:?}"),
    }
    assert!(!service.view().locked);
    // Comments still editable after the failed confirmation.
    service
        .set_comments("second attempt pending".to_string())
        .expect("comments accepted");
}

#[test]
fn confirmation_can_be_retried_after_a_transient_failure() {
    let mailer = Arc::new(FlakyMailer::default());
    let service = AssessmentService::new(
        Arc::new(MemoryRenderer::default()),
        mailer.clone(),
        gate_config(),
        export_config(),
    );
    drive_to_summary(&service);

    assert!(service.confirm_lock().is_err());
    assert!(!service.view().locked);

    let view = service.confirm_lock().expect("retry succeeds");
    assert!(view.locked);
    assert_eq!(mailer.delivered().len(), 1);
}

#[test]
fn locked_assessments_reject_mutations_but_still_export() {
    let (service, _, mailer) = build_service();
    drive_to_summary(service.as_ref());
    service.confirm_lock().expect("lock accepted");

    match service.set_comments("too late".to_string()) {
        Err(AssessmentServiceError::Assessment(AssessmentError::SessionLocked)) => {}
        other => panic!("expected session locked, got {other:?}"),
    }

    let document = service.export_document().expect("export still allowed");
    assert_eq!(document.filename, "MRP_DAGGER 11_2026-03-14.docx");

    service
        .send_email(vec!["ops@example.org".to_string()])
        .expect("email still allowed");
    assert_eq!(mailer.messages().len(), 2);

    service
        .return_to_questions()
        .expect("summary back still allowed");
}

#[test]
fn export_renders_the_projected_fields() {
    let (service, renderer, _) = build_service();
    service.begin().expect("begin accepted");
    service
        .submit_mission_details(mission())
        .expect("mission details accepted");
    service
        .submit_answer(individual(RiskSeverity::Yellow, RiskSeverity::Red))
        .expect("answer accepted");

    let document = service.export_document().expect("export succeeds");
    assert_eq!(document.filename, "MRP_DAGGER 11_2026-03-14.docx");
    assert_eq!(document.bytes, b"rendered-profile".to_vec());

    let calls = renderer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["pic_shortnotice"], "1");
    assert_eq!(calls[0]["cp_shortnotice"], "2");
    assert_eq!(calls[0]["callsign"], "DAGGER 11");
}

#[test]
fn send_email_rejects_an_empty_recipient_list() {
    let (service, _, mailer) = build_service();
    drive_to_summary(service.as_ref());

    match service.send_email(Vec::new()) {
        Err(AssessmentServiceError::Export(ExportError::NoRecipients)) => {}
        other => panic!("expected no recipients, got {other:?}"),
    }
    assert!(mailer.messages().is_empty());
}
