use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{QuizAnswer, StudentId};
use super::repository::{NurtureMailer, PlacementRepository, RepositoryError};
use super::service::{PlacementService, PlacementServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionQuery {
    pub(crate) age: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletePlacementRequest {
    pub(crate) student_id: String,
    pub(crate) answers: Vec<QuizAnswer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewPlacementRequest {
    pub(crate) answers: Vec<QuizAnswer>,
}

/// Router builder exposing the quiz question feed and placement endpoints.
pub fn placement_router<R, M>(service: Arc<PlacementService<R, M>>) -> Router
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    Router::new()
        .route(
            "/api/v1/placement/questions",
            get(questions_handler::<R, M>),
        )
        .route("/api/v1/placement", post(complete_handler::<R, M>))
        .route(
            "/api/v1/placement/preview",
            post(preview_handler::<R, M>),
        )
        .route(
            "/api/v1/placement/students/:student_id",
            get(latest_handler::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<R, M>(
    State(service): State<Arc<PlacementService<R, M>>>,
    Query(query): Query<QuestionQuery>,
) -> Response
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    let questions = service.questions_for(query.age);
    (StatusCode::OK, axum::Json(questions)).into_response()
}

pub(crate) async fn complete_handler<R, M>(
    State(service): State<Arc<PlacementService<R, M>>>,
    axum::Json(request): axum::Json<CompletePlacementRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    match service.complete(StudentId(request.student_id), request.answers) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(PlacementServiceError::InvalidStudent) => {
            let payload = json!({
                "error": PlacementServiceError::InvalidStudent.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn preview_handler<R, M>(
    State(service): State<Arc<PlacementService<R, M>>>,
    axum::Json(request): axum::Json<PreviewPlacementRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    let result = service.preview(&request.answers);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn latest_handler<R, M>(
    State(service): State<Arc<PlacementService<R, M>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    let id = StudentId(student_id);
    match service.latest(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(PlacementServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "student_id": id.0,
                "error": "no placement recorded",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
