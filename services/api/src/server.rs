use crate::cli::ServeArgs;
use crate::infra::{build_enricher, build_tokens, load_catalog, AppState};
use crate::routes::with_platform_routes;
use axum::http::Method;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ecoscan::accounts::{AccountService, InMemoryAccountStore};
use ecoscan::config::AppConfig;
use ecoscan::error::AppError;
use ecoscan::products::{LookupOptions, ProductService};
use ecoscan::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
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

    let catalog = load_catalog(config.catalog.csv_path.as_deref())?;
    let enricher = build_enricher(&config.enrichment, catalog.clone());
    let product_service = Arc::new(ProductService::new(
        catalog,
        enricher,
        LookupOptions {
            read_timeout: config.catalog.read_timeout,
            rescore_alternatives: config.catalog.rescore_alternatives,
        },
    ));

    let account_service = Arc::new(AccountService::new(
        Arc::new(InMemoryAccountStore::default()),
        build_tokens(&config.auth),
        config.auth.reward_points,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    let app = with_platform_routes(product_service, account_service)
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        enrichment = ?config.enrichment.mode,
        rescore_alternatives = config.catalog.rescore_alternatives,
        "ecoscan api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
