use crate::infra::AppState;
use addiction_assessor::assessment::{
    assessment_router, AssessmentService, Scorer, SessionStore,
};
use addiction_assessor::error::AppError;
use addiction_assessor::survey::{SurveyBatchReport, SurveyImporter};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct SurveyBatchRequest {
    /// Raw survey export, header row included.
    pub(crate) csv: String,
}

pub(crate) fn with_assessment_routes<S>(service: Arc<AssessmentService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/survey/batch",
            axum::routing::post(survey_batch_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn survey_batch_endpoint(
    Json(payload): Json<SurveyBatchRequest>,
) -> Result<Json<SurveyBatchReport>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let report = SurveyImporter::score_reader(reader, &Scorer::default())?;

    info!(
        scored = report.scored.len(),
        rejected = report.rejected.len(),
        "survey batch scored"
    );

    Ok(Json(report))
}
