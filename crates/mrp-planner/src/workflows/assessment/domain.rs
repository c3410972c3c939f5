use serde::{Deserialize, Serialize};

/// Severity a question can be answered with; directly worth 0, 1, or 2
/// points toward a crew member's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Green,
    Yellow,
    Red,
}

impl RiskSeverity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Green, Self::Yellow, Self::Red]
    }

    pub const fn points(self) -> u16 {
        match self {
            Self::Green => 0,
            Self::Yellow => 1,
            Self::Red => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
        }
    }
}

/// Hazard grouping the questionnaire walks through, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Mission,
    Environment,
    HumanFactor,
    Aircraft,
}

impl RiskCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Mission,
            Self::Environment,
            Self::HumanFactor,
            Self::Aircraft,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mission => "Mission",
            Self::Environment => "Environment",
            Self::HumanFactor => "Human Factor",
            Self::Aircraft => "Aircraft",
        }
    }
}

/// Mission Decision Authority: which command level must sign off a mission
/// carrying the given risk total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MdaLevel {
    Pic,
    Sup,
    Sc,
    Cmdt,
}

impl MdaLevel {
    /// Fixed ladder; thresholds are squadron doctrine, not configuration.
    pub const fn for_score(total: u16) -> Self {
        match total {
            0..=8 => Self::Pic,
            9..=15 => Self::Sup,
            16..=20 => Self::Sc,
            _ => Self::Cmdt,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pic => "PIC",
            Self::Sup => "SUP",
            Self::Sc => "SC",
            Self::Cmdt => "CMDT",
        }
    }
}

/// Slot a free-text hazard lands in. Three categories carry a shared slot;
/// the human-factor question fans into the two role slots instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSlot {
    Mission,
    Environment,
    Aircraft,
    PicOther,
    CpOther,
}

/// Crew-entered hazard mirrored out of a custom-shape answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHazard {
    pub description: String,
    pub severity: RiskSeverity,
}

/// Header block filled in before the first question. All fields are free
/// text; the projector passes them through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionDetails {
    pub callsign: String,
    pub pic_name: String,
    pub cp_name: String,
    pub ac_nr: String,
    pub lesson: String,
    pub area_assignment: String,
    pub date_time: String,
}

/// Shape-conforming payload for an answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AnswerValue {
    Individual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pic: Option<RiskSeverity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cp: Option<RiskSeverity>,
    },
    Shared {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<RiskSeverity>,
    },
    Custom {
        description: String,
        severity: RiskSeverity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum AnswerDisposition {
    Skipped,
    Answered { value: AnswerValue },
}

/// One recorded response per question, replaced wholesale on every
/// submission so no partially-edited state can leak into scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(flatten)]
    pub disposition: AnswerDisposition,
    /// Out-of-band correction applied to both crew totals when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_severity: Option<RiskSeverity>,
}

impl Answer {
    pub fn answered(value: AnswerValue) -> Self {
        Self {
            disposition: AnswerDisposition::Answered { value },
            override_severity: None,
        }
    }

    pub fn skipped() -> Self {
        Self {
            disposition: AnswerDisposition::Skipped,
            override_severity: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.disposition, AnswerDisposition::Answered { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.disposition, AnswerDisposition::Skipped)
    }

    pub fn value(&self) -> Option<&AnswerValue> {
        match &self.disposition {
            AnswerDisposition::Answered { value } => Some(value),
            AnswerDisposition::Skipped => None,
        }
    }
}
