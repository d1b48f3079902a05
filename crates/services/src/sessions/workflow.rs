use std::sync::Arc;

use rand::Rng;

use quiz_core::ScoreResult;
use quiz_core::model::{AnswerOutcome, Catalog, QuestionId};

use super::service::{QuizSession, SessionOrigin};
use super::store::SessionStore;
use crate::error::SessionError;

/// Session State Manager: restores, mutates, persists, and grades quiz sessions.
///
/// Persistence failures never interrupt a session. They are logged and the
/// in-memory state stays authoritative for the rest of the run.
#[derive(Clone)]
pub struct QuizSessionService {
    catalog: Arc<Catalog>,
    store: SessionStore,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, store: SessionStore) -> Self {
        Self { catalog, store }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Restore the persisted session, or create and persist a fresh one.
    ///
    /// When the store cannot be read the session runs in memory only, so a
    /// transient failure never overwrites saved progress.
    pub async fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizSession {
        let blob = match self.store.load_blob().await {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    key = self.store.key(),
                    "could not read session state; continuing without persistence"
                );
                return QuizSession::unsaved(Arc::clone(&self.catalog), rng);
            }
        };

        let session = QuizSession::from_blob(Arc::clone(&self.catalog), blob.as_deref(), rng);
        if session.origin() == SessionOrigin::Fresh {
            self.save(&session).await;
        }
        session
    }

    /// Record the first answer for a question, persist the whole state, and grade it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Answer` for unknown questions, out-of-range options,
    /// or questions that were already answered. Nothing is persisted in that case.
    pub async fn record_answer(
        &self,
        session: &mut QuizSession,
        id: QuestionId,
        index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.record_answer(id, index).inspect_err(|err| {
            tracing::debug!(question = %id, index, error = %err, "answer rejected");
        })?;
        self.save(session).await;
        tracing::debug!(
            question = %id,
            selected = outcome.selected_index,
            correct = outcome.is_correct,
            "answer recorded"
        );
        Ok(outcome)
    }

    /// Aggregate score for the session. Idempotent and side-effect free.
    #[must_use]
    pub fn compute_score(&self, session: &QuizSession) -> ScoreResult {
        session.score()
    }

    /// Delete the persisted session. The caller re-initializes afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the stored blob cannot be removed.
    pub async fn reset_session(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        tracing::info!(key = self.store.key(), "session state cleared");
        Ok(())
    }

    /// Clear persisted state and start over with a freshly shuffled session.
    ///
    /// The new state is written even if clearing failed, so the previous
    /// attempt cannot be restored afterwards.
    pub async fn restart<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizSession {
        if let Err(err) = self.reset_session().await {
            tracing::warn!(error = %err, "could not clear session state before restart");
        }
        let session = QuizSession::fresh(Arc::clone(&self.catalog), rng);
        self.save(&session).await;
        session
    }

    /// Write the full session state to the store.
    ///
    /// Failures are logged and swallowed; sessions that started without
    /// persistence are skipped.
    pub async fn save(&self, session: &QuizSession) {
        if !session.origin().is_persistent() {
            tracing::debug!(key = self.store.key(), "session is not persisted");
            return;
        }
        if let Err(err) = self.store.save(session.state()).await {
            tracing::warn!(error = %err, key = self.store.key(), "could not persist session state");
        }
    }
}
