use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::conversation::{ConversationError, TurnOutcome};
use super::domain::Profile;
use super::questionnaire::{AnswerKind, QuestionKey, QUESTIONNAIRE};
use super::repository::{SessionId, SessionStore, StoreError};
use super::scoring::{Assessment, FeatureVector, ScoreComponent, TierLevel};
use super::service::{AssessmentService, AssessmentServiceError};

/// Largest request body the interview endpoints accept.
pub const REQUEST_BODY_LIMIT: usize = 16 * 1024;

/// Router builder exposing the interview and scoring endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire", get(questionnaire_handler))
        .route("/api/v1/assessments", post(start_handler::<S>))
        .route("/api/v1/assessments/score", post(score_handler::<S>))
        .route(
            "/api/v1/assessments/:session_id",
            get(status_handler::<S>).delete(discard_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/reset",
            post(reset_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/result",
            get(result_handler::<S>),
        )
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub key: QuestionKey,
    pub prompt: &'static str,
    pub kind: AnswerKind,
}

/// Response to a single answer.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub session_id: SessionId,
    pub accepted: bool,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_prompt: Option<&'static str>,
}

/// Score, tier text and the audit trail behind them.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub score: u8,
    pub raw_score: f64,
    pub level: TierLevel,
    pub tier: &'static str,
    pub description: &'static str,
    pub recommendations: [&'static str; 4],
    pub profile: Profile,
    pub features: FeatureVector,
    pub components: Vec<ScoreComponent>,
}

impl ResultView {
    pub fn new(profile: Profile, assessment: Assessment) -> Self {
        let tier = assessment.tier();
        Self {
            score: assessment.score,
            raw_score: assessment.raw_score,
            level: tier.level,
            tier: tier.label,
            description: tier.description,
            recommendations: tier.recommendations,
            profile,
            features: assessment.features,
            components: assessment.components,
        }
    }
}

pub(crate) async fn questionnaire_handler() -> Json<Vec<QuestionView>> {
    Json(
        QUESTIONNAIRE
            .iter()
            .map(|question| QuestionView {
                key: question.key,
                prompt: question.prompt,
                kind: question.kind(),
            })
            .collect(),
    )
}

pub(crate) async fn start_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.start() {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn discard_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let session_id = SessionId(session_id);
    match service.answer(&session_id, &request.answer) {
        Ok(receipt) => {
            let view = TurnView {
                session_id,
                accepted: !matches!(receipt.outcome, TurnOutcome::Ignored),
                done: receipt.session.conversation.is_done(),
                next_prompt: receipt
                    .session
                    .conversation
                    .current_question()
                    .map(|question| question.prompt),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn result_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.result(&SessionId(session_id)) {
        Ok(result) => {
            let view = ResultView::new(result.profile, result.assessment);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Json(profile): Json<Profile>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.score_profile(&profile) {
        Ok(assessment) => {
            (StatusCode::OK, Json(ResultView::new(profile, assessment))).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let (status, payload) = match &err {
        AssessmentServiceError::Conversation(ConversationError::Answer(answer))
        | AssessmentServiceError::InvalidProfile(answer) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": answer.kind(),
                "question": answer.key(),
                "message": answer.reprompt(),
            }),
        ),
        AssessmentServiceError::Conversation(
            ConversationError::AlreadyComplete | ConversationError::Incomplete { .. },
        ) => (StatusCode::CONFLICT, json!({ "error": err.to_string() })),
        AssessmentServiceError::Store(StoreError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
        }
        AssessmentServiceError::Store(StoreError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        AssessmentServiceError::Store(StoreError::Capacity(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": err.to_string() }),
        ),
        AssessmentServiceError::Store(StoreError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
    };

    (status, Json(payload)).into_response()
}
