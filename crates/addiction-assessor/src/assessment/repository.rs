use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conversation::{ChatMessage, Conversation};
use super::questionnaire::QUESTIONNAIRE;

/// Identifier wrapper for interview sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// High level status of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    InProgress,
    Complete,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Complete => "complete",
        }
    }
}

/// Stored interview together with its bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub conversation: Conversation,
}

impl SessionRecord {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            started_at: now,
            updated_at: now,
            conversation: Conversation::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.conversation.is_done() {
            SessionStatus::Complete
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            status: self.status().label(),
            started_at: self.started_at,
            updated_at: self.updated_at,
            answered: self.conversation.answered(),
            total: QUESTIONNAIRE.len(),
            next_prompt: self
                .conversation
                .current_question()
                .map(|question| question.prompt),
            transcript: self.conversation.transcript().to_vec(),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError>;
    /// Apply `change` to a stored record while holding the store's lock,
    /// so concurrent turns on one session never overwrite each other.
    fn modify<R, F>(&self, id: &SessionId, change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SessionRecord) -> R;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session limit of {0} reached")]
    Capacity(usize),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Public representation of a session's progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub answered: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_prompt: Option<&'static str>,
    pub transcript: Vec<ChatMessage>,
}
