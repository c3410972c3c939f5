//! Compiled-in question catalog.
//!
//! The catalog is the single authority on question order, answer shapes,
//! and the placeholder keys the projector writes. Shapes carry their keys
//! so a question can never declare keys its shape does not use.

use serde::Serialize;

use super::domain::{HazardSlot, RiskCategory, RiskSeverity};

const CUSTOM_PROMPT: &str = "Other identified hazard";
const CUSTOM_OPTIONS: SeverityOptions = SeverityOptions {
    green: "Custom input",
    yellow: None,
    red: None,
};

/// Severity rows offered for a question. Every question has a green row;
/// a handful omit yellow or red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityOptions {
    pub green: &'static str,
    pub yellow: Option<&'static str>,
    pub red: Option<&'static str>,
}

impl SeverityOptions {
    pub const fn full(green: &'static str, yellow: &'static str, red: &'static str) -> Self {
        Self {
            green,
            yellow: Some(yellow),
            red: Some(red),
        }
    }

    pub const fn green_yellow(green: &'static str, yellow: &'static str) -> Self {
        Self {
            green,
            yellow: Some(yellow),
            red: None,
        }
    }

    pub const fn green_red(green: &'static str, red: &'static str) -> Self {
        Self {
            green,
            yellow: None,
            red: Some(red),
        }
    }

    pub const fn text(self, severity: RiskSeverity) -> Option<&'static str> {
        match severity {
            RiskSeverity::Green => Some(self.green),
            RiskSeverity::Yellow => self.yellow,
            RiskSeverity::Red => self.red,
        }
    }

    pub const fn offers(self, severity: RiskSeverity) -> bool {
        self.text(severity).is_some()
    }
}

/// Where a custom question mirrors its free-text hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomWiring {
    /// One shared placeholder key and one category slot, scored for both roles.
    Category {
        slot: HazardSlot,
        key: &'static str,
    },
    /// Role-split wiring; only the human-factor entry uses it.
    PerRole {
        pic_key: &'static str,
        cp_key: &'static str,
    },
}

/// Answer shape together with the placeholder keys it projects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    Individual {
        pic_key: &'static str,
        cp_key: &'static str,
    },
    Shared {
        key: &'static str,
    },
    Custom(CustomWiring),
}

impl AnswerShape {
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Individual { .. } => ShapeKind::Individual,
            Self::Shared { .. } => ShapeKind::Shared,
            Self::Custom(_) => ShapeKind::Custom,
        }
    }
}

/// Shape discriminant used for payload validation and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Individual,
    Shared,
    Custom,
}

impl ShapeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Shared => "shared",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTemplate {
    pub id: &'static str,
    pub category: RiskCategory,
    pub prompt: &'static str,
    pub shape: AnswerShape,
    pub options: SeverityOptions,
}

impl QuestionTemplate {
    const fn individual(
        id: &'static str,
        category: RiskCategory,
        prompt: &'static str,
        pic_key: &'static str,
        cp_key: &'static str,
        options: SeverityOptions,
    ) -> Self {
        Self {
            id,
            category,
            prompt,
            shape: AnswerShape::Individual { pic_key, cp_key },
            options,
        }
    }

    const fn shared(
        id: &'static str,
        category: RiskCategory,
        prompt: &'static str,
        key: &'static str,
        options: SeverityOptions,
    ) -> Self {
        Self {
            id,
            category,
            prompt,
            shape: AnswerShape::Shared { key },
            options,
        }
    }

    const fn custom(
        id: &'static str,
        category: RiskCategory,
        slot: HazardSlot,
        key: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            prompt: CUSTOM_PROMPT,
            shape: AnswerShape::Custom(CustomWiring::Category { slot, key }),
            options: CUSTOM_OPTIONS,
        }
    }

    const fn custom_per_role(
        id: &'static str,
        category: RiskCategory,
        pic_key: &'static str,
        cp_key: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            prompt: CUSTOM_PROMPT,
            shape: AnswerShape::Custom(CustomWiring::PerRole { pic_key, cp_key }),
            options: CUSTOM_OPTIONS,
        }
    }
}

/// Ordered, read-only question set walked by the questionnaire.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<QuestionTemplate>,
}

impl QuestionCatalog {
    /// The squadron standard: 29 questions across four categories.
    pub fn standard() -> Self {
        use RiskCategory::{Aircraft, Environment, HumanFactor, Mission};

        let questions = vec![
            QuestionTemplate::individual(
                "short_notice",
                Mission,
                "Short notice for Mission Change?",
                "pic_shortnotice",
                "cp_shortnotice",
                SeverityOptions::full("N/A", ">1 hour notice", "<1 hour notice"),
            ),
            QuestionTemplate::shared(
                "unfamiliar_airfield",
                Mission,
                "Unfamiliar Airfield?",
                "unfamiliar_airfield",
                SeverityOptions::full(
                    "Both pilots familiar",
                    "1 pilot unfamiliar",
                    "Both pilots unfamiliar",
                ),
            ),
            QuestionTemplate::shared(
                "uncontrolled_field",
                Mission,
                "Uncontrolled airfield?",
                "uncontrolled_airfield",
                SeverityOptions::green_yellow("N/A", "Yes"),
            ),
            QuestionTemplate::shared(
                "area_assignment",
                Mission,
                "Area Assignment",
                "risk_area_assignment",
                SeverityOptions::full(
                    "Overland",
                    "Half Land, Half water",
                    "Bodies of water not within gliding distance / High Terrain & Obstacles",
                ),
            ),
            QuestionTemplate::shared(
                "test_flight",
                Mission,
                "Test Flight?",
                "test_flight",
                SeverityOptions::full("N/A", "FCF/LTF", "GTF/MTF"),
            ),
            QuestionTemplate::shared(
                "lesson_type",
                Mission,
                "Lesson",
                "risk_lesson",
                SeverityOptions::full(
                    "N/A",
                    "Taxiing, CP Maneuvers, Instruments",
                    "Formation, Touch-and-Go, AM",
                ),
            ),
            QuestionTemplate::custom(
                "other_hazard_mission",
                Mission,
                HazardSlot::Mission,
                "other_hazard_mission",
            ),
            QuestionTemplate::shared(
                "clouds_enroute",
                Environment,
                "Clouds Enroute",
                "clouds_enroute",
                SeverityOptions::full("CAVOK/Few", "Scattered/Broken", "Overcast"),
            ),
            QuestionTemplate::shared(
                "temperature",
                Environment,
                "Temperature",
                "temperature",
                SeverityOptions::full("<28°C", "29°C to 33°C", ">34°C"),
            ),
            QuestionTemplate::shared(
                "gustiness",
                Environment,
                "Gustiness",
                "gustiness",
                SeverityOptions::full("No gusts", "≤10 kts", ">10 kts"),
            ),
            QuestionTemplate::shared(
                "crosswind",
                Environment,
                "Crosswind at Landing Aerodrome",
                "crosswind",
                SeverityOptions::full("≤5 kts", "6 to 12 kts", ">12 kts"),
            ),
            QuestionTemplate::shared(
                "cloud_ceiling",
                Environment,
                "Cloud Ceiling at Landing Aerodrome",
                "cloud_ceiling",
                SeverityOptions::full("Unlimited", "≤ 1500' AGL", "≤ 800' AGL"),
            ),
            QuestionTemplate::shared(
                "visibility",
                Environment,
                "Visibility",
                "visibility",
                SeverityOptions::full("CAVOK", "5 miles", "≤3 miles"),
            ),
            QuestionTemplate::shared(
                "runway_condition",
                Environment,
                "Runway Condition Report",
                "rwy_condition",
                SeverityOptions::full("Dry", "Wet", "Standing Water"),
            ),
            QuestionTemplate::shared(
                "birds_condition",
                Environment,
                "Birds Condition",
                "birds_condition",
                SeverityOptions::full("Low", "Medium", "High"),
            ),
            QuestionTemplate::shared(
                "kites_condition",
                Environment,
                "Kites Condition",
                "kites_condition",
                SeverityOptions::full("Low", "Medium", "High"),
            ),
            QuestionTemplate::custom(
                "other_hazard_environment",
                Environment,
                HazardSlot::Environment,
                "other_hazard_environment",
            ),
            QuestionTemplate::individual(
                "last_sortie",
                HumanFactor,
                "Last Sortie",
                "pic_last_sortie",
                "cp_last_sortie",
                SeverityOptions::full("<7 days", "7 to 14 days", ">14 days"),
            ),
            QuestionTemplate::individual(
                "ip_experience",
                HumanFactor,
                "IP and Student Experience Level",
                "pic_ip_hours",
                "cp_ip_hours",
                SeverityOptions::full(">500 hrs", "100 to 500 hrs", "≤100 hrs IP"),
            ),
            QuestionTemplate::individual(
                "sorties_flown",
                HumanFactor,
                "Number of sorties flown",
                "pic_sorties",
                "cp_sorties",
                SeverityOptions::full("0 sortie", "1-2 sorties", "≥ 3 sorties"),
            ),
            QuestionTemplate::individual(
                "sleep_cycle",
                HumanFactor,
                "Sleep Cycle",
                "pic_sleep",
                "cp_sleep",
                SeverityOptions::full(
                    "Well rested (≥8 hours)",
                    "Minimum rest (4 to 8 hours)",
                    "Sleep deprived (<4 hours)",
                ),
            ),
            QuestionTemplate::individual(
                "personal_factor",
                HumanFactor,
                "Personal Factor",
                "pic_personal",
                "cp_personal",
                SeverityOptions::full("None", "At least 1", "At least 2"),
            ),
            QuestionTemplate::individual(
                "fatigue",
                HumanFactor,
                "Fatigue",
                "pic_fatigue",
                "cp_fatigue",
                SeverityOptions::full("Low", "Moderate", "Extreme"),
            ),
            QuestionTemplate::individual(
                "stress",
                HumanFactor,
                "Stress",
                "pic_stress",
                "cp_stress",
                SeverityOptions::full("Low", "Moderate", "Extreme"),
            ),
            QuestionTemplate::custom_per_role(
                "other_hazard_human",
                HumanFactor,
                "pic_other",
                "cp_other",
            ),
            QuestionTemplate::individual(
                "aircraft_type",
                Aircraft,
                "Aircraft Type & Model",
                "pic_ac_type",
                "cp_ac_type",
                SeverityOptions::green_red(
                    "Flown same type/model of AC within the day",
                    "Flown dissimilar type/model of AC within the day",
                ),
            ),
            QuestionTemplate::shared(
                "aircraft_collision",
                Aircraft,
                "Aircraft Collision",
                "collision",
                SeverityOptions::full(
                    "Single ship",
                    "Medium (2-ship formation)",
                    "High (≥2 ship formation)",
                ),
            ),
            QuestionTemplate::shared(
                "previous_discrepancies",
                Aircraft,
                "Previous Aircraft discrepancies",
                "previous_discrepancies",
                SeverityOptions::full(
                    "None",
                    "Radio, Electrical",
                    "Engine Related discrepancies, Flight Controls",
                ),
            ),
            QuestionTemplate::custom(
                "other_hazard_aircraft",
                Aircraft,
                HazardSlot::Aircraft,
                "other_hazard_aircraft",
            ),
        ];

        Self { questions }
    }

    pub fn questions(&self) -> &[QuestionTemplate] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&QuestionTemplate> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<(usize, &QuestionTemplate)> {
        self.questions
            .iter()
            .enumerate()
            .find(|(_, question)| question.id == id)
    }

    pub fn by_category(&self, category: RiskCategory) -> impl Iterator<Item = &QuestionTemplate> {
        self.questions
            .iter()
            .filter(move |question| question.category == category)
    }

    pub fn question_categories(&self) -> Vec<RiskCategory> {
        self.questions.iter().map(|question| question.category).collect()
    }

    /// Placeholder keys declared by the questions, in catalog order.
    pub fn placeholder_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::with_capacity(self.questions.len() + 5);
        for question in &self.questions {
            match question.shape {
                AnswerShape::Individual { pic_key, cp_key } => {
                    keys.push(pic_key);
                    keys.push(cp_key);
                }
                AnswerShape::Shared { key } => keys.push(key),
                AnswerShape::Custom(CustomWiring::Category { key, .. }) => keys.push(key),
                AnswerShape::Custom(CustomWiring::PerRole { pic_key, cp_key }) => {
                    keys.push(pic_key);
                    keys.push(cp_key);
                }
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Mission details and summary count as steps; the welcome screen does not.
    pub fn total_steps(&self) -> usize {
        self.questions.len() + 2
    }
}
