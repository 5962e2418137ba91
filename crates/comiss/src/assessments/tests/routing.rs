use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::assessments::{assessment_router, AssessmentRepository, AssessmentService};

fn json_post(uri: &str, body: &impl serde::Serialize) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serializable body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_returns_created_with_a_receipt() {
    let (service, _) = build_service(extended_config());
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(json_post("/api/v1/assessments", &submission()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "asmt-000001");
    assert_eq!(payload["total_score"], 7);
    assert_eq!(payload["interpretation"]["label"], "More investigation needed");
}

#[tokio::test]
async fn submit_route_rejects_invalid_fields() {
    let (service, repository) = build_service(extended_config());
    let router = assessment_router_with_service(service);

    let mut invalid = submission();
    invalid.gender = Some("Unknown".to_string());

    let response = router
        .oneshot(json_post("/api/v1/assessments", &invalid))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(repository.len(), 0);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("gender"));
}

#[tokio::test]
async fn submit_route_rejects_missing_consent() {
    let (service, _) = build_service(extended_config());
    let router = assessment_router_with_service(service);

    let mut withheld = submission();
    withheld.consent = false;

    let response = router
        .oneshot(json_post("/api/v1/assessments", &withheld))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("consent"));
}

#[tokio::test]
async fn submit_route_maps_storage_failures_to_service_unavailable() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableRepository),
        extended_config(),
    ));
    let router = assessment_router(service);

    let response = router
        .oneshot(json_post("/api/v1/assessments", &submission()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("database offline"));
}

#[tokio::test]
async fn user_header_attaches_ownership() {
    let (service, repository) = build_service(extended_config());
    let router = assessment_router_with_service(service);

    let request = Request::post("/api/v1/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", "user-42")
        .header("x-user-email", "doctor@clinic.example")
        .body(axum::body::Body::from(
            serde_json::to_vec(&submission()).expect("serializable body"),
        ))
        .expect("request builds");

    let response = router.oneshot(request).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = repository.list().expect("listing succeeds");
    assert_eq!(records[0].user_id.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn list_route_returns_records_newest_first() {
    let (service, _) = build_service(extended_config());
    let service = Arc::new(service);
    service
        .submit(submission(), &anonymous())
        .expect("first insert");
    service
        .submit(submission(), &anonymous())
        .expect("second insert");
    let router = assessment_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/assessments")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let records = payload.as_array().expect("array payload");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "asmt-000002");
}

#[tokio::test]
async fn fetch_route_distinguishes_found_from_missing() {
    let (service, _) = build_service(extended_config());
    let service = Arc::new(service);
    let record = service
        .submit(submission(), &anonymous())
        .expect("insert succeeds");
    let router = assessment_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::get(format!("/api/v1/assessments/{}", record.id.0))
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_score"], 7);
    assert_eq!(payload["context"]["city"], "Muscat");

    let missing = router
        .oneshot(
            Request::get("/api/v1/assessments/asmt-999999")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_route_reports_dashboard_statistics() {
    let (service, _) = build_service(extended_config());
    let service = Arc::new(service);
    service
        .submit(submission(), &anonymous())
        .expect("insert succeeds");
    let router = assessment_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/assessments/summary")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["moderate"], 1);
}

#[tokio::test]
async fn export_route_serves_csv_as_an_attachment() {
    let (service, _) = build_service(extended_config());
    let service = Arc::new(service);
    service
        .submit(submission(), &anonymous())
        .expect("insert succeeds");
    let router = assessment_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/assessments/export")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("content disposition");
    assert!(disposition.starts_with("attachment; filename=\"assessments_"));

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let csv = String::from_utf8(body.to_vec()).expect("utf-8 body");
    assert!(csv.contains("Lina Al Harthy"));
}
