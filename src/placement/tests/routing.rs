use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use super::common::*;
use crate::placement::repository::PlacementRepository;
use crate::placement::router::placement_router;
use crate::placement::service::PlacementService;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn questions_endpoint_filters_by_age() {
    let (service, _, _) = memory_service();

    let response = placement_router(service)
        .oneshot(get("/api/v1/placement/questions?age=7"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("question list")
        .iter()
        .filter_map(|q| q["id"].as_str())
        .collect();
    assert!(ids.contains(&"math-1"));
    assert!(!ids.contains(&"math-3"));
    assert_eq!(body[0]["type"], "multiple-choice");
}

#[tokio::test]
async fn questions_endpoint_without_age_returns_preview() {
    let (service, _, _) = memory_service();

    let response = placement_router(service)
        .oneshot(get("/api/v1/placement/questions"))
        .await
        .expect("router responds");

    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn complete_endpoint_stores_and_returns_placement() {
    let (service, repository, _) = memory_service();
    let request = post_json(
        "/api/v1/placement",
        json!({
            "student_id": "stu-100",
            "answers": [
                { "question_id": "bg-1", "answer": "7" },
                { "question_id": "math-1", "answer": 4, "is_correct": true },
                { "question_id": "math-2", "answer": 2, "is_correct": false, "time_spent": 9 }
            ]
        }),
    );

    let response = placement_router(service)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["student_id"], "stu-100");
    assert_eq!(body["tier"], "early-explorers");
    assert_eq!(body["result"]["math_level"], 7);
    assert_eq!(body["answered_questions"], 3);

    assert!(repository
        .latest(&student("stu-100"))
        .expect("repository available")
        .is_some());
}

#[tokio::test]
async fn complete_endpoint_rejects_blank_student() {
    let (service, _, _) = memory_service();
    let request = post_json(
        "/api/v1/placement",
        json!({ "student_id": "", "answers": [] }),
    );

    let response = placement_router(service)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn complete_endpoint_reports_repository_outage() {
    let service = Arc::new(PlacementService::new(
        engine(),
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMailer::default()),
    ));
    let request = post_json(
        "/api/v1/placement",
        json!({ "student_id": "stu-101", "answers": [] }),
    );

    let response = placement_router(service)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("unavailable"));
}

#[tokio::test]
async fn preview_endpoint_scores_without_persisting() {
    let (service, repository, mailer) = memory_service();
    let request = post_json("/api/v1/placement/preview", json!({ "answers": [] }));

    let response = placement_router(service)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tier"], "explorers");
    assert_eq!(body["learning_style"], "mixed");
    assert_eq!(body["overall_level"], 5);

    assert!(repository
        .latest(&student("preview"))
        .expect("repository available")
        .is_none());
    assert!(mailer.requests.lock().expect("mailer mutex poisoned").is_empty());
}

#[tokio::test]
async fn latest_endpoint_returns_not_found_for_unknown_student() {
    let (service, _, _) = memory_service();

    let response = placement_router(service)
        .oneshot(get("/api/v1/placement/students/stu-missing"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["student_id"], "stu-missing");
}

#[tokio::test]
async fn latest_endpoint_returns_stored_placement() {
    let (service, _, _) = memory_service();
    service
        .complete(student("stu-200"), explorer_answers())
        .expect("placement stored");

    let response = placement_router(service)
        .oneshot(get("/api/v1/placement/students/stu-200"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["recommended_start_quest"], "paragraph-harbor");
    assert_eq!(body["result"]["learning_style"], "visual");
}

#[tokio::test]
async fn students_named_like_static_routes_are_still_reachable() {
    let (service, _, _) = memory_service();
    service
        .complete(student("preview"), explorer_answers())
        .expect("placement stored");
    let app = placement_router(service);

    let response = app
        .clone()
        .oneshot(get("/api/v1/placement/students/preview"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["student_id"], "preview");

    let response = app
        .oneshot(get("/api/v1/placement/students/questions"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
