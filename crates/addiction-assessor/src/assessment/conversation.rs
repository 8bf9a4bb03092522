use serde::{Deserialize, Serialize};

use super::domain::{DraftError, Profile, ProfileDraft};
use super::questionnaire::{AnswerError, Question, QUESTIONNAIRE};
use super::scoring::{AssessmentResult, Scorer};

pub const GREETING: &str = "Hi! I'll ask you a few questions to estimate how strongly social media use is affecting you. Let's start - what's your age?";
pub const CLOSING: &str = "Thank you! Here is your assessment based on your responses.";

/// Longest user text echoed into the transcript, in characters.
pub const MAX_ECHO_CHARS: usize = 200;
/// Rejected exchanges kept per question; older ones are dropped.
pub const MAX_KEPT_REJECTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatMessage {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    fn user(text: &str) -> Self {
        let text = match text.char_indices().nth(MAX_ECHO_CHARS) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        };
        Self {
            speaker: Speaker::User,
            text,
        }
    }
}

/// What an accepted (or ignored) turn did to the interview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// Answer stored; ask this next.
    NextQuestion(&'static Question),
    /// Last answer stored; the result is ready.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error("questionnaire is already complete")]
    AlreadyComplete,
    #[error("questionnaire incomplete: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

/// Turn-by-turn interview over [`QUESTIONNAIRE`].
///
/// Each question is asked once, in order. Rejected answers leave the index and
/// the draft untouched; only the transcript records the exchange, and at most
/// [`MAX_KEPT_REJECTIONS`] of them per question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    current_index: usize,
    draft: ProfileDraft,
    done: bool,
    transcript: Vec<ChatMessage>,
    #[serde(default)]
    rejected_streak: usize,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            draft: ProfileDraft::new(),
            done: false,
            transcript: vec![ChatMessage::bot(GREETING)],
            rejected_streak: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question awaiting an answer, or `None` once done.
    pub fn current_question(&self) -> Option<&'static Question> {
        if self.done {
            None
        } else {
            QUESTIONNAIRE.get(self.current_index)
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn answered(&self) -> usize {
        self.draft.answered()
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn submit(&mut self, raw_answer: &str) -> Result<TurnOutcome, ConversationError> {
        if self.done {
            return Err(ConversationError::AlreadyComplete);
        }
        let trimmed = raw_answer.trim();
        if trimmed.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        let Some(question) = QUESTIONNAIRE.get(self.current_index) else {
            return Err(ConversationError::AlreadyComplete);
        };

        let value = match question.interpret(trimmed) {
            Ok(value) => value,
            Err(err) => return Err(self.reject(trimmed, err)),
        };

        match self.draft.record(question.key, value) {
            Ok(()) => {}
            Err(DraftError::Invalid(err)) => return Err(self.reject(trimmed, err)),
            Err(conflict) => return Err(self.draft_conflict(conflict)),
        }

        self.rejected_streak = 0;
        self.transcript.push(ChatMessage::user(trimmed));

        match QUESTIONNAIRE.get(self.current_index + 1) {
            Some(next) => {
                self.current_index += 1;
                self.transcript.push(ChatMessage::bot(next.prompt));
                Ok(TurnOutcome::NextQuestion(next))
            }
            None => {
                self.done = true;
                self.transcript.push(ChatMessage::bot(CLOSING));
                Ok(TurnOutcome::Complete)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn profile(&self) -> Result<Profile, ConversationError> {
        if !self.done {
            return Err(self.incomplete());
        }
        self.draft.finish().map_err(|_| self.incomplete())
    }

    /// Score the finished interview. Fails fast while questions remain.
    pub fn result(&self, scorer: &Scorer) -> Result<AssessmentResult, ConversationError> {
        let profile = self.profile()?;
        let assessment = scorer.assess(&profile);
        Ok(AssessmentResult {
            profile,
            assessment,
        })
    }

    /// Record a rejected exchange, keeping only the latest few for the
    /// current question.
    fn reject(&mut self, raw_answer: &str, err: AnswerError) -> ConversationError {
        if self.rejected_streak < MAX_KEPT_REJECTIONS {
            self.rejected_streak += 1;
        } else if let Some(oldest) = self.transcript.len().checked_sub(2 * self.rejected_streak) {
            self.transcript.drain(oldest..oldest + 2);
        }
        self.transcript.push(ChatMessage::user(raw_answer));
        self.transcript.push(ChatMessage::bot(err.reprompt()));
        err.into()
    }

    fn draft_conflict(&self, err: DraftError) -> ConversationError {
        match err {
            DraftError::Invalid(err) => err.into(),
            // The index only moves forward, so a recorded key means the
            // interview has already moved past it.
            DraftError::AlreadyAnswered(_) => ConversationError::AlreadyComplete,
            DraftError::Missing(_) => self.incomplete(),
        }
    }

    fn incomplete(&self) -> ConversationError {
        ConversationError::Incomplete {
            answered: self.draft.answered(),
            total: QUESTIONNAIRE.len(),
        }
    }
}
