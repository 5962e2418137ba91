use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use comiss::assessments::{assessment_router, AssessmentRepository, AssessmentService};
use comiss::contact::{contact_router, ContactService, NotificationPublisher};
use comiss::reference;
use serde_json::json;
use std::sync::Arc;

/// Assemble the full route table: assessment intake and dashboard routes,
/// the contact channel, reference data, and operational endpoints.
pub(crate) fn with_service_routes<R, N>(
    assessments: Arc<AssessmentService<R>>,
    contact: Arc<ContactService<N>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    assessment_router(assessments)
        .merge(contact_router(contact))
        .route(
            "/api/v1/reference/countries",
            axum::routing::get(countries_endpoint),
        )
        .route(
            "/api/v1/reference/governorates",
            axum::routing::get(governorates_endpoint),
        )
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

pub(crate) async fn countries_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "countries": reference::COUNTRIES }))
}

pub(crate) async fn governorates_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "country": reference::OMAN,
        "governorates": reference::OMANI_GOVERNORATES,
    }))
}
