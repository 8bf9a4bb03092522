//! Social media addiction interview: questionnaire, conversation controller,
//! rubric scoring, and the session service that fronts them over HTTP.

pub mod conversation;
pub mod domain;
pub mod questionnaire;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use conversation::{ChatMessage, Conversation, ConversationError, Speaker, TurnOutcome};
pub use domain::{AnswerValue, DraftError, Profile, ProfileDraft};
pub use questionnaire::{
    question, AnswerDomain, AnswerError, AnswerErrorKind, AnswerKind, Question, QuestionKey,
    QUESTIONNAIRE,
};
pub use repository::{SessionId, SessionRecord, SessionStatus, SessionStore, SessionView, StoreError};
pub use router::{assessment_router, AnswerRequest, ResultView, TurnView};
pub use scoring::{
    classify, encode, score, Assessment, AssessmentResult, FeatureVector, Scorer, ScoringWeights,
    Tier, TierLevel,
};
pub use service::{AnswerReceipt, AssessmentService, AssessmentServiceError};
