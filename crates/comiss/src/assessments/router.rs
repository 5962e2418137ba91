use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::{AssessmentId, AssessmentSubmission, SessionContext};
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, SubmissionError};

/// Router exposing the assessment intake, listing, dashboard summary, and
/// CSV export endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route("/api/v1/assessments/summary", get(summary_handler::<R>))
        .route("/api/v1/assessments/export", get(export_handler::<R>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(fetch_handler::<R>),
        )
        .with_state(service)
}

/// Optional signed-in identity forwarded by the frontend proxy. Absent
/// headers mean an anonymous submission.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> SessionContext {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match user_id {
        Some(id) => {
            let email = headers
                .get("x-user-email")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());
            SessionContext::for_user(id, email)
        }
        None => SessionContext::anonymous(),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let session = session_from_headers(&headers);
    match service.submit(submission, &session) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.receipt())).into_response(),
        Err(error @ SubmissionError::Validation(_))
        | Err(error @ SubmissionError::ConsentRequired) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::Storage(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => storage_error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "assessment not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => storage_error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => storage_error_response(error),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.export_csv() {
        Ok(csv) => {
            let filename = format!(
                "assessments_{}.csv",
                Local::now().date_naive().format("%Y-%m-%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn storage_error_response(error: super::repository::StorageError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}
