//! Questionnaire navigation state machine.
//!
//! Steps are numbered over the whole flow: welcome is step 0 and is never
//! counted, mission details is step 1, question `i` is step `i + 2`, and
//! the summary sits at `total_steps`. Completed and skipped steps are kept
//! disjoint by every transition that touches them.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use super::domain::RiskCategory;

pub const MISSION_DETAILS_STEP: usize = 1;
pub const QUESTION_STEP_OFFSET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum StepPosition {
    Welcome,
    MissionDetails,
    Question { index: usize },
    Summary,
}

impl StepPosition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::MissionDetails => "mission details",
            Self::Question { .. } => "question",
            Self::Summary => "summary",
        }
    }
}

/// Sidebar status for one question step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStepStatus {
    Completed,
    Skipped,
    Current,
    Available,
    Locked,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("question step {index} has not been reached yet")]
    LockedStep { index: usize },
    #[error("question index {index} is out of range")]
    QuestionOutOfRange { index: usize },
    #[error("action not available on the {page} page")]
    WrongPage { page: &'static str },
}

/// Position, step bookkeeping, and the per-question category track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    position: StepPosition,
    categories: Vec<RiskCategory>,
    question_index: usize,
    current_category: Option<RiskCategory>,
    completed_steps: BTreeSet<usize>,
    skipped_steps: BTreeSet<usize>,
}

impl NavigationState {
    /// Starts a fresh flow on the welcome screen. `question_categories`
    /// carries one entry per question, in catalog order.
    pub fn new(question_categories: Vec<RiskCategory>) -> Self {
        Self {
            position: StepPosition::Welcome,
            categories: question_categories,
            question_index: 0,
            current_category: None,
            completed_steps: BTreeSet::new(),
            skipped_steps: BTreeSet::new(),
        }
    }

    pub fn position(&self) -> StepPosition {
        self.position
    }

    pub fn current_category(&self) -> Option<RiskCategory> {
        self.current_category
    }

    pub fn current_question_index(&self) -> Option<usize> {
        match self.position {
            StepPosition::Question { index } => Some(index),
            _ => None,
        }
    }

    /// Highest question index still relevant for summary back navigation.
    pub fn latest_question_index(&self) -> usize {
        self.question_index
    }

    pub fn question_count(&self) -> usize {
        self.categories.len()
    }

    /// Counted steps: mission details, every question, and the summary.
    pub fn total_steps(&self) -> usize {
        self.categories.len() + 2
    }

    pub fn current_step(&self) -> usize {
        match self.position {
            StepPosition::Welcome => 0,
            StepPosition::MissionDetails => MISSION_DETAILS_STEP,
            StepPosition::Question { index } => index + QUESTION_STEP_OFFSET,
            StepPosition::Summary => self.total_steps(),
        }
    }

    /// Fraction of counted steps completed, independent of position.
    pub fn progress(&self) -> f64 {
        self.completed_steps.len() as f64 / self.total_steps() as f64
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.position, StepPosition::Question { .. })
    }

    pub fn question_status(&self, target: usize) -> QuestionStepStatus {
        let step = target + QUESTION_STEP_OFFSET;
        if self.completed_steps.contains(&step) {
            return QuestionStepStatus::Completed;
        }
        if self.skipped_steps.contains(&step) {
            return QuestionStepStatus::Skipped;
        }
        match self.position {
            StepPosition::Question { index } if index == target => QuestionStepStatus::Current,
            _ if target <= self.question_index => QuestionStepStatus::Available,
            _ => QuestionStepStatus::Locked,
        }
    }

    pub fn question_statuses(&self) -> Vec<QuestionStepStatus> {
        (0..self.categories.len())
            .map(|index| self.question_status(index))
            .collect()
    }

    /// Welcome screen -> mission details.
    pub fn begin(&mut self) -> Result<(), NavigationError> {
        match self.position {
            StepPosition::Welcome => {
                self.position = StepPosition::MissionDetails;
                Ok(())
            }
            other => Err(NavigationError::WrongPage {
                page: other.label(),
            }),
        }
    }

    /// Mission details -> first question; the details step counts as done.
    pub fn complete_mission_details(&mut self) -> Result<(), NavigationError> {
        match self.position {
            StepPosition::MissionDetails => {
                self.completed_steps.insert(MISSION_DETAILS_STEP);
                self.skipped_steps.remove(&MISSION_DETAILS_STEP);
                if self.categories.is_empty() {
                    self.position = StepPosition::Summary;
                } else {
                    self.question_index = 0;
                    self.current_category = Some(self.categories[0]);
                    self.position = StepPosition::Question { index: 0 };
                }
                Ok(())
            }
            other => Err(NavigationError::WrongPage {
                page: other.label(),
            }),
        }
    }

    /// Marks the current question answered and advances.
    pub fn complete_current_question(&mut self) -> Result<(), NavigationError> {
        let index = self.require_question_page()?;
        let step = index + QUESTION_STEP_OFFSET;
        self.skipped_steps.remove(&step);
        self.completed_steps.insert(step);
        self.advance(index);
        Ok(())
    }

    /// Marks the current question skipped and advances.
    pub fn skip_current_question(&mut self) -> Result<(), NavigationError> {
        let index = self.require_question_page()?;
        let step = index + QUESTION_STEP_OFFSET;
        self.completed_steps.remove(&step);
        self.skipped_steps.insert(step);
        self.advance(index);
        Ok(())
    }

    /// One step back; from the first question this returns to mission
    /// details without touching the category.
    pub fn go_back(&mut self) -> Result<(), NavigationError> {
        let index = self.require_question_page()?;
        if index == 0 {
            self.position = StepPosition::MissionDetails;
        } else {
            self.move_to_question(index - 1);
        }
        Ok(())
    }

    /// Direct jump from one question to another. Steps strictly ahead that
    /// were never completed or skipped stay locked. Membership in the step
    /// sets never changes here.
    pub fn jump_to_question(&mut self, target: usize) -> Result<(), NavigationError> {
        let index = self.require_question_page()?;
        if target >= self.categories.len() {
            return Err(NavigationError::QuestionOutOfRange { index: target });
        }
        let step = target + QUESTION_STEP_OFFSET;
        let visited =
            self.completed_steps.contains(&step) || self.skipped_steps.contains(&step);
        if visited || target <= index {
            self.move_to_question(target);
            Ok(())
        } else {
            Err(NavigationError::LockedStep { index: target })
        }
    }

    /// Summary -> the question the flow last sat on.
    pub fn return_to_questions(&mut self) -> Result<(), NavigationError> {
        match self.position {
            StepPosition::Summary => {
                if self.categories.is_empty() {
                    return Err(NavigationError::QuestionOutOfRange { index: 0 });
                }
                self.move_to_question(self.question_index.min(self.categories.len() - 1));
                Ok(())
            }
            other => Err(NavigationError::WrongPage {
                page: other.label(),
            }),
        }
    }

    fn require_question_page(&self) -> Result<usize, NavigationError> {
        match self.position {
            StepPosition::Question { index } => Ok(index),
            other => Err(NavigationError::WrongPage {
                page: other.label(),
            }),
        }
    }

    fn move_to_question(&mut self, index: usize) {
        self.question_index = index;
        self.current_category = Some(self.categories[index]);
        self.position = StepPosition::Question { index };
    }

    fn advance(&mut self, from: usize) {
        let next = from + 1;
        if next < self.categories.len() {
            self.move_to_question(next);
        } else {
            // Category stays on the last question's for the summary header.
            self.position = StepPosition::Summary;
        }
    }
}
