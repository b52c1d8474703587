use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::domain::Barcode;
use super::service::{LookupError, ProductService};
use super::store::CatalogStore;
use crate::accounts::{require_auth, AuthenticatedUser, TokenService};

/// Router builder exposing lookup, message polling, search, and image updates.
pub fn product_router<C>(service: Arc<ProductService<C>>, tokens: Arc<TokenService>) -> Router
where
    C: CatalogStore + 'static,
{
    let protected = Router::new()
        .route("/api/v1/products/image", put(update_image_handler::<C>))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth));

    Router::new()
        .route("/api/v1/products/barcode/:barcode", get(lookup_handler::<C>))
        .route("/api/v1/products/:barcode/message", get(message_handler::<C>))
        .route("/api/v1/products/search", get(search_handler::<C>))
        .merge(protected)
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageUpdate {
    barcode: String,
    image_url: String,
}

pub(crate) async fn lookup_handler<C>(
    State(service): State<Arc<ProductService<C>>>,
    Path(barcode): Path<String>,
) -> Response
where
    C: CatalogStore + 'static,
{
    match service.lookup(&Barcode(barcode)).await {
        Ok(lookup) => (StatusCode::OK, Json(lookup)).into_response(),
        Err(err) => error_response(err, "internal server error reading product"),
    }
}

pub(crate) async fn message_handler<C>(
    State(service): State<Arc<ProductService<C>>>,
    Path(barcode): Path<String>,
) -> Response
where
    C: CatalogStore + 'static,
{
    match service.message(&Barcode(barcode)).await {
        Ok(status) if status.is_ready() => (StatusCode::OK, Json(status)).into_response(),
        Ok(status) => (StatusCode::ACCEPTED, Json(status)).into_response(),
        Err(err) => error_response(err, "internal server error reading message"),
    }
}

pub(crate) async fn search_handler<C>(
    State(service): State<Arc<ProductService<C>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: CatalogStore + 'static,
{
    match service.search(&params.q).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => error_response(err, "could not perform search"),
    }
}

pub(crate) async fn update_image_handler<C>(
    State(service): State<Arc<ProductService<C>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(update): Json<ImageUpdate>,
) -> Response
where
    C: CatalogStore + 'static,
{
    let barcode = Barcode(update.barcode);
    match service.update_image(&barcode, &update.image_url).await {
        Ok(product) => {
            info!(%barcode, user_id = %user.0, "product image updated");
            (StatusCode::OK, Json(product)).into_response()
        }
        Err(err) => error_response(err, "failed updating image url"),
    }
}

fn error_response(err: LookupError, internal_message: &'static str) -> Response {
    let (status, message) = match &err {
        LookupError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        LookupError::EmptyQuery => (StatusCode::BAD_REQUEST, err.to_string()),
        LookupError::DataAccess(source) => {
            error!(error = %source, "catalog access failed");
            (StatusCode::INTERNAL_SERVER_ERROR, internal_message.to_string())
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}
