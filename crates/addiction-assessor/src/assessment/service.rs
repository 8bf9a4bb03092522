use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::conversation::{ConversationError, TurnOutcome};
use super::domain::Profile;
use super::questionnaire::AnswerError;
use super::repository::{SessionId, SessionRecord, SessionStore, StoreError};
use super::scoring::{Assessment, AssessmentResult, Scorer, ScoringWeights};

/// Service composing the session store and the scorer.
pub struct AssessmentService<S> {
    store: Arc<S>,
    scorer: Arc<Scorer>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

/// Accepted turn plus the session state after it.
#[derive(Debug, Clone)]
pub struct AnswerReceipt {
    pub session: SessionRecord,
    pub outcome: TurnOutcome,
}

impl<S> AssessmentService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, weights: ScoringWeights) -> Self {
        Self {
            store,
            scorer: Arc::new(Scorer::new(weights)),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Open a new interview and persist it.
    pub fn start(&self) -> Result<SessionRecord, AssessmentServiceError> {
        let record = SessionRecord::new(next_session_id(), Utc::now());
        let stored = self.store.insert(record).map_err(|err| {
            warn!(error = %err, "unable to open assessment session");
            err
        })?;
        info!(session_id = %stored.session_id.0, "assessment session started");
        Ok(stored)
    }

    /// Forward one raw answer to the session's conversation.
    ///
    /// The turn runs under the store's lock. Rejected answers still persist,
    /// since the transcript records the re-prompt.
    pub fn answer(
        &self,
        session_id: &SessionId,
        raw_answer: &str,
    ) -> Result<AnswerReceipt, AssessmentServiceError> {
        let (submitted, session) = self.store.modify(session_id, |record| {
            let submitted = record.conversation.submit(raw_answer);
            if !matches!(
                submitted,
                Ok(TurnOutcome::Ignored)
                    | Err(ConversationError::AlreadyComplete)
                    | Err(ConversationError::Incomplete { .. })
            ) {
                record.updated_at = Utc::now();
            }
            (submitted, record.clone())
        })?;

        match submitted {
            Ok(outcome) => {
                if outcome == TurnOutcome::Complete {
                    info!(session_id = %session_id.0, "assessment questionnaire complete");
                }
                Ok(AnswerReceipt { session, outcome })
            }
            Err(ConversationError::Answer(err)) => {
                debug!(
                    session_id = %session_id.0,
                    question = %err.key(),
                    kind = ?err.kind(),
                    "answer rejected"
                );
                Err(ConversationError::Answer(err).into())
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn reset(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self.store.modify(session_id, |record| {
            record.conversation.reset();
            record.updated_at = Utc::now();
            record.clone()
        })?;
        info!(session_id = %session_id.0, "assessment session reset");
        Ok(record)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        self.fetch(session_id)
    }

    /// Drop a session so its slot can be reused.
    pub fn discard(&self, session_id: &SessionId) -> Result<(), AssessmentServiceError> {
        self.store.remove(session_id)?;
        info!(session_id = %session_id.0, "assessment session discarded");
        Ok(())
    }

    /// Score a completed session; incomplete sessions are rejected.
    pub fn result(
        &self,
        session_id: &SessionId,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        let record = self.fetch(session_id)?;
        let result = record.conversation.result(&self.scorer)?;
        Ok(result)
    }

    /// Score a profile gathered outside the interview, after domain checks.
    pub fn score_profile(&self, profile: &Profile) -> Result<Assessment, AssessmentServiceError> {
        profile
            .validate()
            .map_err(AssessmentServiceError::InvalidProfile)?;
        Ok(self.scorer.assess(profile))
    }

    fn fetch(&self, session_id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self
            .store
            .fetch(session_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid profile: {0}")]
    InvalidProfile(AnswerError),
}
