use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessment::router::{start_handler, REQUEST_BODY_LIMIT};
use crate::assessment::{AssessmentService, ScoringWeights};

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn questionnaire_route_lists_questions_in_order() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router.oneshot(get("/api/v1/questionnaire")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let questions = body.as_array().expect("question list");
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0]["key"], "age");
    assert_eq!(questions[0]["kind"], "numeric");
    assert_eq!(questions[4]["key"], "platform");
    assert_eq!(questions[4]["kind"], "text");
}

#[tokio::test]
async fn start_route_creates_session() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/assessments", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["answered"], 0);
    assert_eq!(body["total"], 10);
    assert_eq!(body["next_prompt"], "What's your age?");
    assert_eq!(body["transcript"][0]["speaker"], "bot");
}

#[tokio::test]
async fn start_handler_reports_capacity_as_unavailable() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(FullStore),
        ScoringWeights::STANDARD,
    ));

    let response = start_handler::<FullStore>(State(service)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn start_handler_reports_store_outage_as_internal_error() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableStore),
        ScoringWeights::STANDARD,
    ));

    let response = start_handler::<UnavailableStore>(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("cache offline"));
}

#[tokio::test]
async fn answer_route_walks_interview_to_result() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);
    let answers_uri = format!("/api/v1/assessments/{}/answers", id.0);

    for (index, answer) in SCENARIO_ANSWERS.iter().enumerate() {
        let response = router
            .clone()
            .oneshot(post_json(&answers_uri, json!({ "answer": answer })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["accepted"], true);
        assert_eq!(body["done"], index == SCENARIO_ANSWERS.len() - 1);
    }

    let response = router
        .oneshot(get(&format!("/api/v1/assessments/{}/result", id.0)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"], 5);
    assert_eq!(body["level"], "moderate");
    assert_eq!(body["tier"], "Moderate");
    assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["profile"]["platform"], "Instagram");
    assert_eq!(body["features"]["gender"], 1.0);
    assert_eq!(body["components"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn answer_route_rejects_invalid_answers() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);
    let answers_uri = format!("/api/v1/assessments/{}/answers", id.0);

    let response = router
        .clone()
        .oneshot(post_json(&answers_uri, json!({ "answer": "abc" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "parse");
    assert_eq!(body["question"], "age");
    assert_eq!(body["message"], "Please enter a valid number.");

    let response = router
        .clone()
        .oneshot(post_json(&answers_uri, json!({ "answer": "19" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(post_json(&answers_uri, json!({ "answer": "xyz" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["question"], "gender");
}

#[tokio::test]
async fn oversized_answer_body_is_refused() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);
    let answers_uri = format!("/api/v1/assessments/{}/answers", id.0);

    let response = router
        .oneshot(post_json(
            &answers_uri,
            json!({ "answer": "x".repeat(REQUEST_BODY_LIMIT) }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.transcript().len(), 1);
}

#[tokio::test]
async fn blank_answer_is_not_accepted_but_succeeds() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/assessments/{}/answers", id.0),
            json!({ "answer": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["accepted"], false);
    assert_eq!(body["done"], false);
    assert_eq!(body["next_prompt"], "What's your age?");
}

#[tokio::test]
async fn result_route_conflicts_while_incomplete() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!("/api/v1/assessments/{}/result", id.0)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn answer_after_completion_conflicts() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    for answer in SCENARIO_ANSWERS {
        service.answer(&id, answer).expect("answer accepted");
    }
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/assessments/{}/answers", id.0),
            json!({ "answer": "19" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reset_and_status_routes_reflect_progress() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    service.answer(&id, "19").expect("age accepted");
    let router = router_with_service(service);
    let status_uri = format!("/api/v1/assessments/{}", id.0);

    let response = router.clone().oneshot(get(&status_uri)).await.unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body["answered"], 1);

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/assessments/{}/reset", id.0),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get(&status_uri)).await.unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body["answered"], 0);
    assert!(body["started_at"].is_string());
    assert!(body["updated_at"].is_string());
    assert_eq!(body["transcript"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn delete_route_discards_session() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);
    let uri = format!("/api/v1/assessments/{}", id.0);

    let response = router
        .clone()
        .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.stored(&id).is_none());

    let response = router.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/assessments/session-unknown"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn score_route_scores_profiles_directly() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/assessments/score",
            serde_json::to_value(maximal_profile()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"], 10);
    assert_eq!(body["tier"], "Very High");
}

#[tokio::test]
async fn score_route_rejects_out_of_domain_profile() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let mut profile = scenario_profile();
    profile.sleep_hours = 1.0;

    let response = router
        .oneshot(post_json(
            "/api/v1/assessments/score",
            serde_json::to_value(profile).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["question"], "sleepHours");
}
