use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::assessment::catalog::QuestionCatalog;
use crate::workflows::assessment::domain::{
    Answer, AnswerValue, CustomHazard, HazardSlot, MdaLevel, RiskSeverity,
};
use crate::workflows::assessment::scoring::compute_scores;

fn hazard(description: &str, severity: RiskSeverity) -> CustomHazard {
    CustomHazard {
        description: description.to_string(),
        severity,
    }
}

#[test]
fn empty_session_scores_zero_for_both_roles() {
    let catalog = QuestionCatalog::standard();
    let report = compute_scores(&catalog, &BTreeMap::new(), &BTreeMap::new());

    assert_eq!(report.pic_total, 0);
    assert_eq!(report.cp_total, 0);
    assert_eq!(report.pic_mda, MdaLevel::Pic);
    assert_eq!(report.cp_mda, MdaLevel::Pic);
}

#[test]
fn shared_answer_lands_on_both_totals() {
    let catalog = QuestionCatalog::standard();
    let mut answers = BTreeMap::new();
    answers.insert(
        "unfamiliar_airfield",
        Answer::answered(shared(RiskSeverity::Yellow)),
    );

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 1);
    assert_eq!(report.cp_total, 1);
}

#[test]
fn individual_answer_scores_roles_independently() {
    let catalog = QuestionCatalog::standard();
    let mut answers = BTreeMap::new();
    answers.insert(
        "short_notice",
        Answer::answered(individual(RiskSeverity::Red, RiskSeverity::Green)),
    );

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 2);
    assert_eq!(report.cp_total, 0);
}

#[test]
fn individual_answer_defaults_an_unset_role_to_zero() {
    let catalog = QuestionCatalog::standard();
    let mut answers = BTreeMap::new();
    answers.insert(
        "fatigue",
        Answer::answered(AnswerValue::Individual {
            pic: Some(RiskSeverity::Yellow),
            cp: None,
        }),
    );

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 1);
    assert_eq!(report.cp_total, 0);
}

#[test]
fn skipped_answer_contributes_nothing() {
    let catalog = QuestionCatalog::standard();
    let mut answers = BTreeMap::new();
    answers.insert("temperature", Answer::skipped());

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 0);
    assert_eq!(report.cp_total, 0);
}

#[test]
fn override_supersedes_recorded_values_for_both_roles() {
    let catalog = QuestionCatalog::standard();
    let mut answer = Answer::answered(individual(RiskSeverity::Red, RiskSeverity::Red));
    answer.override_severity = Some(RiskSeverity::Green);
    let mut answers = BTreeMap::new();
    answers.insert("short_notice", answer);

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 0);
    assert_eq!(report.cp_total, 0);
}

#[test]
fn override_raises_a_shared_answer_on_both_totals() {
    let catalog = QuestionCatalog::standard();
    let mut answer = Answer::answered(shared(RiskSeverity::Green));
    answer.override_severity = Some(RiskSeverity::Red);
    let mut answers = BTreeMap::new();
    answers.insert("visibility", answer);

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 2);
    assert_eq!(report.cp_total, 2);
}

#[test]
fn override_applies_to_skip_records() {
    let catalog = QuestionCatalog::standard();
    let mut answer = Answer::skipped();
    answer.override_severity = Some(RiskSeverity::Yellow);
    let mut answers = BTreeMap::new();
    answers.insert("gustiness", answer);

    let report = compute_scores(&catalog, &answers, &BTreeMap::new());
    assert_eq!(report.pic_total, 1);
    assert_eq!(report.cp_total, 1);
}

#[test]
fn category_hazard_slots_score_both_roles() {
    let catalog = QuestionCatalog::standard();
    let mut hazards = BTreeMap::new();
    hazards.insert(HazardSlot::Environment, hazard("Glare", RiskSeverity::Yellow));

    let report = compute_scores(&catalog, &BTreeMap::new(), &hazards);
    assert_eq!(report.pic_total, 1);
    assert_eq!(report.cp_total, 1);
}

#[test]
fn role_hazard_slots_score_one_side_only() {
    let catalog = QuestionCatalog::standard();
    let mut hazards = BTreeMap::new();
    hazards.insert(HazardSlot::PicOther, hazard("Head cold", RiskSeverity::Red));
    hazards.insert(HazardSlot::CpOther, hazard("New boots", RiskSeverity::Yellow));

    let report = compute_scores(&catalog, &BTreeMap::new(), &hazards);
    assert_eq!(report.pic_total, 2);
    assert_eq!(report.cp_total, 1);
}

#[test]
fn overridden_custom_question_excludes_its_hazard_slot() {
    let catalog = QuestionCatalog::standard();
    let mut hazards = BTreeMap::new();
    hazards.insert(HazardSlot::Mission, hazard("FOD on apron", RiskSeverity::Yellow));

    let mut answers = BTreeMap::new();
    answers.insert(
        "other_hazard_mission",
        Answer::answered(custom("FOD on apron", RiskSeverity::Yellow)),
    );
    let baseline = compute_scores(&catalog, &answers, &hazards);
    assert_eq!(baseline.pic_total, 1);
    assert_eq!(baseline.cp_total, 1);

    let mut overridden = Answer::answered(custom("FOD on apron", RiskSeverity::Yellow));
    overridden.override_severity = Some(RiskSeverity::Green);
    answers.insert("other_hazard_mission", overridden);

    let report = compute_scores(&catalog, &answers, &hazards);
    assert_eq!(report.pic_total, 0);
    assert_eq!(report.cp_total, 0);
}

#[test]
fn tier_ladder_boundaries() {
    assert_eq!(MdaLevel::for_score(0), MdaLevel::Pic);
    assert_eq!(MdaLevel::for_score(8), MdaLevel::Pic);
    assert_eq!(MdaLevel::for_score(9), MdaLevel::Sup);
    assert_eq!(MdaLevel::for_score(15), MdaLevel::Sup);
    assert_eq!(MdaLevel::for_score(16), MdaLevel::Sc);
    assert_eq!(MdaLevel::for_score(20), MdaLevel::Sc);
    assert_eq!(MdaLevel::for_score(21), MdaLevel::Cmdt);
    assert_eq!(MdaLevel::for_score(58), MdaLevel::Cmdt);
}

#[test]
fn tier_labels_match_command_levels() {
    assert_eq!(MdaLevel::Pic.label(), "PIC");
    assert_eq!(MdaLevel::Sup.label(), "SUP");
    assert_eq!(MdaLevel::Sc.label(), "SC");
    assert_eq!(MdaLevel::Cmdt.label(), "CMDT");
}

#[test]
fn reference_mix_totals_six_and_four() {
    let catalog = QuestionCatalog::standard();
    let mut answers = BTreeMap::new();
    answers.insert(
        "short_notice",
        Answer::answered(individual(RiskSeverity::Yellow, RiskSeverity::Green)),
    );
    answers.insert(
        "last_sortie",
        Answer::answered(individual(RiskSeverity::Red, RiskSeverity::Yellow)),
    );
    answers.insert(
        "unfamiliar_airfield",
        Answer::answered(shared(RiskSeverity::Red)),
    );
    answers.insert(
        "other_hazard_aircraft",
        Answer::answered(custom("Soft brakes", RiskSeverity::Yellow)),
    );
    let mut hazards = BTreeMap::new();
    hazards.insert(HazardSlot::Aircraft, hazard("Soft brakes", RiskSeverity::Yellow));

    let report = compute_scores(&catalog, &answers, &hazards);
    assert_eq!(report.pic_total, 6);
    assert_eq!(report.cp_total, 4);
    assert_eq!(report.pic_mda, MdaLevel::Pic);
    assert_eq!(report.cp_mda, MdaLevel::Pic);

    // Zeroing the second individual by override drops both totals.
    let mut corrected = Answer::answered(individual(RiskSeverity::Red, RiskSeverity::Yellow));
    corrected.override_severity = Some(RiskSeverity::Green);
    answers.insert("last_sortie", corrected);

    let report = compute_scores(&catalog, &answers, &hazards);
    assert_eq!(report.pic_total, 4);
    assert_eq!(report.cp_total, 3);
}

#[test]
fn result_is_independent_of_answer_insertion_order() {
    let catalog = QuestionCatalog::standard();

    let mut forward = BTreeMap::new();
    forward.insert("short_notice", Answer::answered(individual(RiskSeverity::Yellow, RiskSeverity::Red)));
    forward.insert("visibility", Answer::answered(shared(RiskSeverity::Yellow)));
    forward.insert("stress", Answer::answered(individual(RiskSeverity::Green, RiskSeverity::Yellow)));

    let mut reversed = BTreeMap::new();
    reversed.insert("stress", Answer::answered(individual(RiskSeverity::Green, RiskSeverity::Yellow)));
    reversed.insert("visibility", Answer::answered(shared(RiskSeverity::Yellow)));
    reversed.insert("short_notice", Answer::answered(individual(RiskSeverity::Yellow, RiskSeverity::Red)));

    let first = compute_scores(&catalog, &forward, &BTreeMap::new());
    let second = compute_scores(&catalog, &reversed, &BTreeMap::new());
    assert_eq!(first, second);
    assert_eq!(first.pic_total, 2);
    assert_eq!(first.cp_total, 4);
}
