use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState, InMemoryPlacementRepository, LoggingMailer};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kidquest_placement::config::AppConfig;
use kidquest_placement::error::AppError;
use kidquest_placement::placement::PlacementService;
use kidquest_placement::telemetry;
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

    let engine = build_engine(&config.placement)?;
    info!(
        questions = engine.bank().len(),
        custom_bank = config.placement.question_bank.is_some(),
        "question bank loaded"
    );

    let repository = Arc::new(InMemoryPlacementRepository::default());
    let mailer = Arc::new(LoggingMailer::default());
    let placement_service = Arc::new(PlacementService::new(engine, repository, mailer));

    let app = with_placement_routes(placement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
