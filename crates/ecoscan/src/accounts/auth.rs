use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use super::domain::UserId;
use super::tokens::{TokenError, TokenService};

/// Request extension inserted by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Rejects requests without a valid `Authorization: Bearer` access token.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match bearer_token(header) {
        Ok(token) => token.to_string(),
        Err(reason) => {
            debug!(reason, "rejecting unauthenticated request");
            return unauthorized(reason);
        }
    };

    match tokens.verify(&token) {
        Ok(user_id) => {
            debug!(%user_id, method = %request.method(), path = request.uri().path(), "request authorized");
            request.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(request).await
        }
        Err(TokenError::Expired) => unauthorized("token has expired"),
        Err(err @ TokenError::Claim(_)) => {
            warn!(error = %err, "token carried malformed claims");
            unauthorized("invalid token claims")
        }
        Err(err) => {
            warn!(error = %err, "token rejected");
            unauthorized("invalid token")
        }
    }
}

/// Extracts the token from `Bearer <token>`; the scheme is case-insensitive.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, &'static str> {
    let header = header.ok_or("authorization header required")?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err("invalid token format"),
    }
}

fn unauthorized(message: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
