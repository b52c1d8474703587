use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use chrono::Duration;
use serde_json::Value;

use crate::accounts::domain::{
    NewUser, ProductRequestRecord, ProductRequestSubmission, ProfileUpdate, RefreshTokenRecord,
    RegisterRequest, User, UserId,
};
use crate::accounts::memory::InMemoryAccountStore;
use crate::accounts::service::AccountService;
use crate::accounts::store::{AccountStore, AccountStoreError};
use crate::accounts::tokens::TokenService;

pub(super) const REWARD_POINTS: i64 = 10;

pub(super) fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        b"account-test-secret",
        Duration::minutes(15),
        Duration::days(7),
    ))
}

pub(super) fn build_service() -> (AccountService<InMemoryAccountStore>, Arc<InMemoryAccountStore>) {
    let store = Arc::new(InMemoryAccountStore::default());
    let service = AccountService::new(store.clone(), tokens(), REWARD_POINTS);
    (service, store)
}

pub(super) fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Nusrat Jahan".to_string(),
        email: email.to_string(),
        password: "green-leaf-42".to_string(),
    }
}

pub(super) fn submission(barcode: &str) -> ProductRequestSubmission {
    ProductRequestSubmission {
        barcode: barcode.to_string(),
        name: "Mustard Oil".to_string(),
        brand_name: "Radhuni".to_string(),
        image_url: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("valid json body")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    body: &Value,
    bearer: Option<&str>,
) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

fn down() -> AccountStoreError {
    AccountStoreError::Unavailable("database offline".to_string())
}

#[async_trait]
impl AccountStore for UnavailableStore {
    async fn insert_user(&self, _user: NewUser) -> Result<User, AccountStoreError> {
        Err(down())
    }

    async fn user_by_email(&self, _email: &str) -> Result<Option<User>, AccountStoreError> {
        Err(down())
    }

    async fn update_profile(
        &self,
        _id: UserId,
        _update: &ProfileUpdate,
    ) -> Result<User, AccountStoreError> {
        Err(down())
    }

    async fn save_refresh_token(
        &self,
        _record: RefreshTokenRecord,
    ) -> Result<(), AccountStoreError> {
        Err(down())
    }

    async fn record_product_request(
        &self,
        _user_id: UserId,
        _submission: ProductRequestSubmission,
        _reward_points: i64,
    ) -> Result<(ProductRequestRecord, User), AccountStoreError> {
        Err(down())
    }
}
