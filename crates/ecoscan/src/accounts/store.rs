use async_trait::async_trait;

use super::domain::{
    NewUser, ProductRequestRecord, ProductRequestSubmission, ProfileUpdate, RefreshTokenRecord,
    User, UserId,
};

/// Storage abstraction so the account service can be exercised in isolation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<User, AccountStoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AccountStoreError>;
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, AccountStoreError>;
    /// Upsert keyed by user.
    async fn save_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), AccountStoreError>;
    /// Records the request and credits the user in one operation.
    async fn record_product_request(
        &self,
        user_id: UserId,
        submission: ProductRequestSubmission,
        reward_points: i64,
    ) -> Result<(ProductRequestRecord, User), AccountStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}
