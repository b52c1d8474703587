use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ecoscan::accounts::{account_router, AccountService, AccountStore};
use ecoscan::products::{product_router, CatalogStore, ProductService};
use serde_json::json;
use std::sync::Arc;

/// Product and account APIs plus the operational endpoints.
pub(crate) fn with_platform_routes<C, S>(
    products: Arc<ProductService<C>>,
    accounts: Arc<AccountService<S>>,
) -> axum::Router
where
    C: CatalogStore + 'static,
    S: AccountStore + 'static,
{
    let tokens = accounts.tokens();

    product_router(products, tokens)
        .merge(account_router(accounts))
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
