//! Risk scoring fold over the answer set.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::catalog::{AnswerShape, CustomWiring, QuestionCatalog};
use super::domain::{Answer, AnswerValue, CustomHazard, HazardSlot, MdaLevel, RiskSeverity};

/// Point totals and sign-off tiers for both crew members, recomputed from
/// scratch on every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub pic_total: u16,
    pub cp_total: u16,
    pub pic_mda: MdaLevel,
    pub cp_mda: MdaLevel,
}

/// Folds every recorded answer and mirrored hazard into two crew totals.
///
/// Unanswered questions contribute nothing, so partial sessions score
/// correctly at any point in the questionnaire. An override severity is the
/// overridden question's entire contribution: it lands on both totals and
/// its mirrored hazard slots, if any, are left out of the hazard fold.
pub fn compute_scores(
    catalog: &QuestionCatalog,
    answers: &BTreeMap<&'static str, Answer>,
    hazards: &BTreeMap<HazardSlot, CustomHazard>,
) -> ScoreReport {
    let mut pic_total = 0u16;
    let mut cp_total = 0u16;
    let mut overridden_slots = BTreeSet::new();

    for question in catalog.questions() {
        let Some(answer) = answers.get(question.id) else {
            continue;
        };
        if let Some(severity) = answer.override_severity {
            pic_total += severity.points();
            cp_total += severity.points();
            if let AnswerShape::Custom(wiring) = question.shape {
                match wiring {
                    CustomWiring::Category { slot, .. } => {
                        overridden_slots.insert(slot);
                    }
                    CustomWiring::PerRole { .. } => {
                        overridden_slots.insert(HazardSlot::PicOther);
                        overridden_slots.insert(HazardSlot::CpOther);
                    }
                }
            }
            continue;
        }
        match answer.value() {
            Some(AnswerValue::Individual { pic, cp }) => {
                pic_total += pic.map_or(0, RiskSeverity::points);
                cp_total += cp.map_or(0, RiskSeverity::points);
            }
            Some(AnswerValue::Shared { severity }) => {
                let points = severity.map_or(0, RiskSeverity::points);
                pic_total += points;
                cp_total += points;
            }
            // Custom answers score through their mirrored hazard slots below.
            Some(AnswerValue::Custom { .. }) | None => {}
        }
    }

    for (slot, hazard) in hazards {
        if overridden_slots.contains(slot) {
            continue;
        }
        let points = hazard.severity.points();
        match slot {
            HazardSlot::PicOther => pic_total += points,
            HazardSlot::CpOther => cp_total += points,
            HazardSlot::Mission | HazardSlot::Environment | HazardSlot::Aircraft => {
                pic_total += points;
                cp_total += points;
            }
        }
    }

    ScoreReport {
        pic_total,
        cp_total,
        pic_mda: MdaLevel::for_score(pic_total),
        cp_mda: MdaLevel::for_score(cp_total),
    }
}
