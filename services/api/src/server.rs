use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAssessmentRepository, InMemoryNotificationPublisher};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use comiss::assessments::AssessmentService;
use comiss::config::AppConfig;
use comiss::contact::ContactService;
use comiss::error::AppError;
use comiss::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let assessment_service = Arc::new(AssessmentService::new(repository, config.scoring));
    let publisher = Arc::new(InMemoryNotificationPublisher::default());
    let contact_service = Arc::new(ContactService::new(publisher));

    let app = with_service_routes(assessment_service, contact_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        schema = config.scoring.schema.label(),
        scheme = config.scoring.scheme.label(),
        "assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
