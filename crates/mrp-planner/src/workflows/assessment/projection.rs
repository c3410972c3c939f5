//! Flattens a session into the key/value map document templates consume.

use std::collections::BTreeMap;

use super::catalog::{AnswerShape, CustomWiring, QuestionCatalog};
use super::domain::{Answer, AnswerValue, CustomHazard, HazardSlot, MissionDetails, RiskSeverity};
use super::scoring::ScoreReport;

pub const PIC_TOTAL_KEY: &str = "pic_mrp";
pub const CP_TOTAL_KEY: &str = "cp_mrp";
pub const PIC_MDA_KEY: &str = "pic_mda";
pub const CP_MDA_KEY: &str = "cp_mda";
pub const COMMENTS_KEY: &str = "comments";

pub const MISSION_FIELD_KEYS: [&str; 7] = [
    "callsign",
    "pic_name",
    "cp_name",
    "ac_nr",
    "lesson",
    "area_assignment",
    "date_time",
];

pub const FIXED_KEYS: [&str; 5] = [
    PIC_TOTAL_KEY,
    CP_TOTAL_KEY,
    PIC_MDA_KEY,
    CP_MDA_KEY,
    COMMENTS_KEY,
];

/// Resolves every placeholder key the catalog declares, plus the mission
/// header fields, totals, tiers, and comments. Total; anything unanswered
/// degrades to `"0"` or the empty string.
pub fn project(
    catalog: &QuestionCatalog,
    mission: &MissionDetails,
    answers: &BTreeMap<&'static str, Answer>,
    hazards: &BTreeMap<HazardSlot, CustomHazard>,
    score: &ScoreReport,
    comments: &str,
) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    fields.insert("callsign".to_string(), mission.callsign.clone());
    fields.insert("pic_name".to_string(), mission.pic_name.clone());
    fields.insert("cp_name".to_string(), mission.cp_name.clone());
    fields.insert("ac_nr".to_string(), mission.ac_nr.clone());
    fields.insert("lesson".to_string(), mission.lesson.clone());
    fields.insert("area_assignment".to_string(), mission.area_assignment.clone());
    fields.insert("date_time".to_string(), mission.date_time.clone());

    for question in catalog.questions() {
        let answer = answers.get(question.id);
        let override_points = answer
            .and_then(|answer| answer.override_severity)
            .map(RiskSeverity::points);
        match question.shape {
            AnswerShape::Individual { pic_key, cp_key } => {
                let (pic, cp) = match answer.and_then(Answer::value) {
                    Some(AnswerValue::Individual { pic, cp }) => (*pic, *cp),
                    _ => (None, None),
                };
                fields.insert(pic_key.to_string(), points_text(override_points, pic));
                fields.insert(cp_key.to_string(), points_text(override_points, cp));
            }
            AnswerShape::Shared { key } => {
                let severity = match answer.and_then(Answer::value) {
                    Some(AnswerValue::Shared { severity }) => *severity,
                    _ => None,
                };
                fields.insert(key.to_string(), points_text(override_points, severity));
            }
            // Custom questions project the mirrored hazard severity; the
            // free-text description never reaches the template.
            AnswerShape::Custom(CustomWiring::Category { slot, key }) => {
                let severity = hazards.get(&slot).map(|hazard| hazard.severity);
                fields.insert(key.to_string(), points_text(override_points, severity));
            }
            AnswerShape::Custom(CustomWiring::PerRole { pic_key, cp_key }) => {
                let pic = hazards.get(&HazardSlot::PicOther).map(|hazard| hazard.severity);
                let cp = hazards.get(&HazardSlot::CpOther).map(|hazard| hazard.severity);
                fields.insert(pic_key.to_string(), points_text(override_points, pic));
                fields.insert(cp_key.to_string(), points_text(override_points, cp));
            }
        }
    }

    fields.insert(PIC_TOTAL_KEY.to_string(), score.pic_total.to_string());
    fields.insert(CP_TOTAL_KEY.to_string(), score.cp_total.to_string());
    fields.insert(PIC_MDA_KEY.to_string(), score.pic_mda.label().to_string());
    fields.insert(CP_MDA_KEY.to_string(), score.cp_mda.label().to_string());
    fields.insert(COMMENTS_KEY.to_string(), comments.to_string());

    fields
}

fn points_text(override_points: Option<u16>, severity: Option<RiskSeverity>) -> String {
    override_points
        .unwrap_or_else(|| severity.map_or(0, RiskSeverity::points))
        .to_string()
}
