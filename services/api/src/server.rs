use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::model::AnalyticDeviceModel;
use crate::routes::{screening_routes, ScreeningContext};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mosfet_screener::config::AppConfig;
use mosfet_screener::error::AppError;
use mosfet_screener::screening::{BaselineSet, ModelRegistry, ScreeningService};
use mosfet_screener::telemetry;
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

    let context = ScreeningContext {
        service: Arc::new(ScreeningService::new(
            Arc::new(AnalyticDeviceModel),
            BaselineSet::standard(),
        )),
        predictors: Arc::new(ModelRegistry::new()),
    };

    let app = screening_routes(context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "material screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
