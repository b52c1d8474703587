use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{post, put},
    Extension, Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::auth::{require_auth, AuthenticatedUser};
use super::domain::{LoginRequest, ProductRequestSubmission, ProfileUpdate, RegisterRequest};
use super::service::{AccountError, AccountService};
use super::store::AccountStore;

/// Registration, login, profile updates, and product requests.
pub fn account_router<S>(service: Arc<AccountService<S>>) -> Router
where
    S: AccountStore + 'static,
{
    let protected = Router::new()
        .route("/api/v1/users/me", put(update_profile_handler::<S>))
        .route("/api/v1/products/requests", post(product_request_handler::<S>))
        .route_layer(middleware::from_fn_with_state(service.tokens(), require_auth));

    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<S>))
        .route("/api/v1/auth/login", post(login_handler::<S>))
        .merge(protected)
        .with_state(service)
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Json(request): Json<RegisterRequest>,
) -> Response
where
    S: AccountStore + 'static,
{
    match service.register(request).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "message": "user registered successfully", "user": user })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn login_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: AccountStore + 'static,
{
    match service.login(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_profile_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    S: AccountStore + 'static,
{
    match service.update_profile(user_id, update).await {
        Ok(user) => (
            StatusCode::OK,
            Json(json!({ "message": "profile updated", "user": user })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn product_request_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(submission): Json<ProductRequestSubmission>,
) -> Response
where
    S: AccountStore + 'static,
{
    match service.submit_product_request(user_id, submission).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AccountError) -> Response {
    let (status, message) = match &err {
        AccountError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        AccountError::EmailTaken => (StatusCode::CONFLICT, err.to_string()),
        AccountError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        AccountError::UserNotFound => {
            warn!("authenticated user no longer exists");
            (StatusCode::NOT_FOUND, err.to_string())
        }
        AccountError::Password(_) | AccountError::Token(_) | AccountError::Store(_) => {
            error!(error = %err, "account operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}
