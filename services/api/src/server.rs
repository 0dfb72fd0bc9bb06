use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use ecotrack::config::AppConfig;
use ecotrack::error::AppError;
use ecotrack::footprint::HttpPredictor;
use ecotrack::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{seed_directory, AppState, InMemoryStore};
use crate::routes::with_core_routes;

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

    let store = Arc::new(InMemoryStore::default());
    seed_directory(&store);
    let predictor = HttpPredictor::new(&config.ml)?;

    let app = with_core_routes(store, predictor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ml = %config.ml.base_url, "carbon tracking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
