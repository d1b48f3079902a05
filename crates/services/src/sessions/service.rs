use std::fmt;
use std::sync::Arc;

use rand::Rng;

use quiz_core::model::{AnswerOutcome, Catalog, Question, QuestionId, SessionState};
use quiz_core::{ScoreResult, compute_score};

use super::progress::SessionProgress;
use super::store::decode;
use crate::error::SessionError;

//
// ─── ORIGIN ────────────────────────────────────────────────────────────────────
//

/// How a live session came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Reconciled from a valid persisted blob.
    Restored,
    /// Newly shuffled because no usable blob existed.
    Fresh,
    /// Newly shuffled because the store could not be read. Never written back,
    /// so whatever is stored survives until an explicit restart.
    Unsaved,
}

impl SessionOrigin {
    /// Whether changes to this session may be written to the store.
    #[must_use]
    pub fn is_persistent(self) -> bool {
        !matches!(self, Self::Unsaved)
    }
}

//
// ─── QUESTION IN SESSION ORDER ─────────────────────────────────────────────────
//

/// A question as the presentation layer sees it: session position plus answer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionQuestion<'a> {
    pub position: usize,
    pub question: &'a Question,
    pub selected: Option<usize>,
}

impl SessionQuestion<'_> {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// `Some(true/false)` once answered, `None` while pending.
    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        self.selected.map(|index| self.question.is_correct(index))
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Live quiz attempt over a catalog.
///
/// Owns the session state; persistence is handled by `QuizSessionService`.
#[derive(Clone)]
pub struct QuizSession {
    catalog: Arc<Catalog>,
    state: SessionState,
    origin: SessionOrigin,
}

impl QuizSession {
    /// Start a fresh attempt with a shuffled question order.
    pub fn fresh<R: Rng + ?Sized>(catalog: Arc<Catalog>, rng: &mut R) -> Self {
        let state = SessionState::fresh(&catalog, rng);
        Self {
            catalog,
            state,
            origin: SessionOrigin::Fresh,
        }
    }

    /// Start an in-memory attempt that is never persisted.
    pub fn unsaved<R: Rng + ?Sized>(catalog: Arc<Catalog>, rng: &mut R) -> Self {
        Self {
            origin: SessionOrigin::Unsaved,
            ..Self::fresh(catalog, rng)
        }
    }

    /// Reconcile an optional persisted blob with the catalog.
    ///
    /// Malformed blobs and blobs that no longer match the catalog are discarded
    /// and a fresh session is produced instead. This never fails.
    pub fn from_blob<R: Rng + ?Sized>(
        catalog: Arc<Catalog>,
        blob: Option<&str>,
        rng: &mut R,
    ) -> Self {
        let Some(blob) = blob else {
            tracing::debug!("no persisted session; starting fresh");
            return Self::fresh(catalog, rng);
        };

        let snapshot = match decode(blob) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::debug!(error = %err, "discarding malformed session blob");
                return Self::fresh(catalog, rng);
            }
        };

        match SessionState::restore(&catalog, snapshot) {
            Ok(state) => {
                tracing::debug!(
                    questions = state.questions_order().len(),
                    answered = state.answered_count(),
                    "restored persisted session"
                );
                Self {
                    catalog,
                    state,
                    origin: SessionOrigin::Restored,
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "persisted session does not match catalog");
                Self::fresh(catalog, rng)
            }
        }
    }

    #[must_use]
    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Questions in session order with their recorded answers.
    pub fn questions(&self) -> impl Iterator<Item = SessionQuestion<'_>> + '_ {
        self.state
            .questions_order()
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                self.catalog.get(*id).map(|question| SessionQuestion {
                    position,
                    question,
                    selected: self.state.answer_for(*id),
                })
            })
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<usize> {
        self.state.answer_for(id)
    }

    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.state.is_answered(id)
    }

    /// Record and grade the first answer for a question (in memory only).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Answer` when the submission is rejected; the
    /// session is left unchanged in that case.
    pub fn record_answer(
        &mut self,
        id: QuestionId,
        index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        Ok(self.state.record_answer(&self.catalog, id, index)?)
    }

    /// Aggregate score over the full catalog. Pure; may be called at any time.
    #[must_use]
    pub fn score(&self) -> ScoreResult {
        compute_score(&self.catalog, self.state.answers())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.catalog.len();
        let answered = self.state.answered_count();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: answered >= total,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.catalog.len())
            .field("answered", &self.state.answered_count())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
