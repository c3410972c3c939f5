//! The in-memory assessment session.
//!
//! One session holds everything a crew enters: mission details, answers,
//! mirrored custom hazards, comments, the navigation state, and the lock
//! flags. Once locked, mutations are rejected; navigation and reads stay
//! available so the summary can still be browsed and exported.

use std::collections::BTreeMap;

use thiserror::Error;

use super::catalog::{AnswerShape, CustomWiring, QuestionCatalog, QuestionTemplate, ShapeKind};
use super::domain::{
    Answer, AnswerValue, CustomHazard, HazardSlot, MissionDetails, RiskSeverity,
};
use super::navigation::{NavigationError, NavigationState};
use super::projection::project;
use super::scoring::{compute_scores, ScoreReport};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("unknown question id: {id}")]
    UnknownQuestion { id: String },
    #[error("question {id} takes a {expected} answer, got {got}")]
    ShapeMismatch {
        id: String,
        expected: &'static str,
        got: &'static str,
    },
    #[error("no answer recorded for question {id}")]
    AnswerNotRecorded { id: String },
    #[error("assessment is locked")]
    SessionLocked,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    catalog: QuestionCatalog,
    mission: MissionDetails,
    answers: BTreeMap<&'static str, Answer>,
    hazards: BTreeMap<HazardSlot, CustomHazard>,
    comments: String,
    navigation: NavigationState,
    locked: bool,
    review_notified: bool,
}

impl AssessmentSession {
    pub fn new(catalog: QuestionCatalog) -> Self {
        let navigation = NavigationState::new(catalog.question_categories());
        Self {
            catalog,
            mission: MissionDetails::default(),
            answers: BTreeMap::new(),
            hazards: BTreeMap::new(),
            comments: String::new(),
            navigation,
            locked: false,
            review_notified: false,
        }
    }

    /// Fresh session over the standard catalog.
    pub fn standard() -> Self {
        Self::new(QuestionCatalog::standard())
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn mission(&self) -> &MissionDetails {
        &self.mission
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn answer(&self, id: &str) -> Option<&Answer> {
        self.answers.get(id)
    }

    pub fn answers(&self) -> &BTreeMap<&'static str, Answer> {
        &self.answers
    }

    pub fn hazards(&self) -> &BTreeMap<HazardSlot, CustomHazard> {
        &self.hazards
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn review_notified(&self) -> bool {
        self.review_notified
    }

    pub fn scores(&self) -> ScoreReport {
        compute_scores(&self.catalog, &self.answers, &self.hazards)
    }

    /// Template fields for the current state, totals included.
    pub fn projected_fields(&self) -> BTreeMap<String, String> {
        let score = self.scores();
        project(
            &self.catalog,
            &self.mission,
            &self.answers,
            &self.hazards,
            &score,
            &self.comments,
        )
    }

    pub fn begin(&mut self) -> Result<(), AssessmentError> {
        self.navigation.begin()?;
        Ok(())
    }

    pub fn submit_mission_details(
        &mut self,
        details: MissionDetails,
    ) -> Result<(), AssessmentError> {
        self.ensure_unlocked()?;
        self.navigation.complete_mission_details()?;
        self.mission = details;
        Ok(())
    }

    /// Records an answer for the question currently on screen and returns
    /// its id. The stored record is replaced wholesale, which also drops
    /// any earlier override.
    pub fn submit_answer(&mut self, value: AnswerValue) -> Result<&'static str, AssessmentError> {
        self.ensure_unlocked()?;
        let question = self.current_question()?;

        let expected = question.shape.kind();
        let got = value_kind(&value);
        if expected != got {
            return Err(AssessmentError::ShapeMismatch {
                id: question.id.to_string(),
                expected: expected.label(),
                got: got.label(),
            });
        }

        if let (AnswerShape::Custom(wiring), AnswerValue::Custom {
            description,
            severity,
        }) = (question.shape, &value)
        {
            self.mirror_custom_hazard(wiring, description, *severity);
        }

        self.answers.insert(question.id, Answer::answered(value));
        self.navigation.complete_current_question()?;
        Ok(question.id)
    }

    /// Replaces the current question's record with a skip and returns its
    /// id. Custom hazard slots are cleared so a skip rescores like a
    /// never-answered question.
    pub fn skip_current(&mut self) -> Result<&'static str, AssessmentError> {
        self.ensure_unlocked()?;
        let question = self.current_question()?;
        if let AnswerShape::Custom(wiring) = question.shape {
            self.clear_custom_hazard(wiring);
        }
        self.answers.insert(question.id, Answer::skipped());
        self.navigation.skip_current_question()?;
        Ok(question.id)
    }

    pub fn go_back(&mut self) -> Result<(), AssessmentError> {
        self.navigation.go_back()?;
        Ok(())
    }

    pub fn jump_to_question(&mut self, target: usize) -> Result<(), AssessmentError> {
        self.navigation.jump_to_question(target)?;
        Ok(())
    }

    pub fn return_to_questions(&mut self) -> Result<(), AssessmentError> {
        self.navigation.return_to_questions()?;
        Ok(())
    }

    /// Sets or clears the out-of-band override on an existing record.
    pub fn set_override(
        &mut self,
        id: &str,
        severity: Option<RiskSeverity>,
    ) -> Result<(), AssessmentError> {
        self.ensure_unlocked()?;
        let (_, question) = self
            .catalog
            .find(id)
            .ok_or_else(|| AssessmentError::UnknownQuestion { id: id.to_string() })?;
        let question_id = question.id;
        match self.answers.get_mut(question_id) {
            Some(answer) => {
                answer.override_severity = severity;
                Ok(())
            }
            None => Err(AssessmentError::AnswerNotRecorded { id: id.to_string() }),
        }
    }

    pub fn set_comments(&mut self, comments: String) -> Result<(), AssessmentError> {
        self.ensure_unlocked()?;
        self.comments = comments;
        Ok(())
    }

    /// Flag order matters for the one-shot notification: callers flip this
    /// after a successful dispatch and before locking.
    pub fn mark_review_notified(&mut self) {
        self.review_notified = true;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    fn ensure_unlocked(&self) -> Result<(), AssessmentError> {
        if self.locked {
            Err(AssessmentError::SessionLocked)
        } else {
            Ok(())
        }
    }

    fn current_question(&self) -> Result<QuestionTemplate, AssessmentError> {
        let index = match self.navigation.current_question_index() {
            Some(index) => index,
            None => {
                return Err(AssessmentError::Navigation(NavigationError::WrongPage {
                    page: self.navigation.position().label(),
                }))
            }
        };
        let question = self
            .catalog
            .question(index)
            .ok_or(NavigationError::QuestionOutOfRange { index })?;
        Ok(*question)
    }

    fn mirror_custom_hazard(
        &mut self,
        wiring: CustomWiring,
        description: &str,
        severity: RiskSeverity,
    ) {
        if description.trim().is_empty() {
            self.clear_custom_hazard(wiring);
            return;
        }
        let hazard = CustomHazard {
            description: description.to_string(),
            severity,
        };
        match wiring {
            CustomWiring::Category { slot, .. } => {
                self.hazards.insert(slot, hazard);
            }
            CustomWiring::PerRole { .. } => {
                self.hazards.insert(HazardSlot::PicOther, hazard.clone());
                self.hazards.insert(HazardSlot::CpOther, hazard);
            }
        }
    }

    fn clear_custom_hazard(&mut self, wiring: CustomWiring) {
        match wiring {
            CustomWiring::Category { slot, .. } => {
                self.hazards.remove(&slot);
            }
            CustomWiring::PerRole { .. } => {
                self.hazards.remove(&HazardSlot::PicOther);
                self.hazards.remove(&HazardSlot::CpOther);
            }
        }
    }
}

fn value_kind(value: &AnswerValue) -> ShapeKind {
    match value {
        AnswerValue::Individual { .. } => ShapeKind::Individual,
        AnswerValue::Shared { .. } => ShapeKind::Shared,
        AnswerValue::Custom { .. } => ShapeKind::Custom,
    }
}
