use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::catalog::Catalog;
use crate::model::ids::QuestionId;

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//

/// Persisted session blob: `{ "questionsOrder": [...], "answers": { "<id>": idx } }`.
///
/// This is the unchecked wire form; `SessionState::restore` validates it against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub questions_order: Vec<QuestionId>,
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, usize>,
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why a persisted snapshot cannot be reused with the current catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RestoreError {
    #[error("persisted order has {found} questions, catalog has {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("persisted order references unknown question {0}")]
    UnknownQuestion(QuestionId),

    #[error("persisted order repeats question {0}")]
    DuplicateQuestion(QuestionId),

    #[error("persisted answer {index} for question {id} is not valid")]
    InvalidAnswer { id: QuestionId, index: usize },
}

/// Rejected answer submissions. None of these change session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("unknown question {0}")]
    UnknownQuestion(QuestionId),

    #[error("option {index} is out of range for question {id}")]
    InvalidOption { id: QuestionId, index: usize },

    #[error("question {0} has already been answered")]
    AlreadyAnswered(QuestionId),
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Grading result for a single recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_index: usize,
    pub selected_index: usize,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Question order and recorded answers for one quiz attempt.
///
/// The order is a permutation of the catalog ids fixed at creation; answers only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    questions_order: Vec<QuestionId>,
    answers: BTreeMap<QuestionId, usize>,
}

impl SessionState {
    /// Start a fresh attempt: shuffled order, no answers.
    pub fn fresh<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        let mut questions_order: Vec<QuestionId> = catalog.ids().collect();
        questions_order.shuffle(rng);
        Self {
            questions_order,
            answers: BTreeMap::new(),
        }
    }

    /// Validate a persisted snapshot against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `RestoreError` if the order is not a permutation of the catalog ids,
    /// or if any stored answer points at an unknown question or option.
    pub fn restore(catalog: &Catalog, snapshot: SessionSnapshot) -> Result<Self, RestoreError> {
        let SessionSnapshot {
            questions_order,
            answers,
        } = snapshot;

        if questions_order.len() != catalog.len() {
            return Err(RestoreError::LengthMismatch {
                expected: catalog.len(),
                found: questions_order.len(),
            });
        }

        let mut seen = HashSet::with_capacity(questions_order.len());
        for id in &questions_order {
            if !catalog.contains(*id) {
                return Err(RestoreError::UnknownQuestion(*id));
            }
            if !seen.insert(*id) {
                return Err(RestoreError::DuplicateQuestion(*id));
            }
        }

        for (&id, &index) in &answers {
            let valid = catalog
                .get(id)
                .is_some_and(|question| question.is_valid_option(index));
            if !valid {
                return Err(RestoreError::InvalidAnswer { id, index });
            }
        }

        Ok(Self {
            questions_order,
            answers,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            questions_order: self.questions_order.clone(),
            answers: self.answers.clone(),
        }
    }

    #[must_use]
    pub fn questions_order(&self) -> &[QuestionId] {
        &self.questions_order
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<QuestionId, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<usize> {
        self.answers.get(&id).copied()
    }

    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.answers.contains_key(&id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Record the first answer for a question and grade it.
    ///
    /// The first answer is final: a second submission is rejected and the
    /// stored answer is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` for unknown questions, out-of-range options, or
    /// questions that already have an answer.
    pub fn record_answer(
        &mut self,
        catalog: &Catalog,
        id: QuestionId,
        index: usize,
    ) -> Result<AnswerOutcome, AnswerError> {
        let question = catalog.get(id).ok_or(AnswerError::UnknownQuestion(id))?;
        if !question.is_valid_option(index) {
            return Err(AnswerError::InvalidOption { id, index });
        }
        if self.answers.contains_key(&id) {
            return Err(AnswerError::AlreadyAnswered(id));
        }

        self.answers.insert(id, index);

        Ok(AnswerOutcome {
            is_correct: question.is_correct(index),
            correct_index: question.answer(),
            selected_index: index,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
