use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    LoginRequest, LoginResponse, NewUser, ProductRequestReceipt, ProductRequestSubmission,
    ProfileUpdate, RefreshTokenRecord, RegisterRequest, User, UserId,
};
use super::password::{
    hash_password_async, verify_password_async, PasswordError, MIN_PASSWORD_LENGTH,
};
use super::store::{AccountStore, AccountStoreError};
use super::tokens::{TokenError, TokenService};

/// Service composing the account store, password hashing, and token issuance.
pub struct AccountService<S> {
    store: Arc<S>,
    tokens: Arc<TokenService>,
    reward_points: i64,
}

impl<S> AccountService<S>
where
    S: AccountStore + 'static,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>, reward_points: i64) -> Self {
        Self {
            store,
            tokens,
            reward_points,
        }
    }

    pub fn tokens(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, AccountError> {
        let name = request.name.trim().to_string();
        let email = normalize_email(&request.email);

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AccountError::Validation(
                "name, email and password required".to_string(),
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::Validation(format!(
                "password length must be at least {MIN_PASSWORD_LENGTH}"
            )));
        }

        let password_hash = hash_password_async(request.password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AccountError> {
        let email = normalize_email(&request.email);
        let user = self
            .store
            .user_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password_async(request.password, user.password_hash.clone()).await? {
            return Err(AccountError::InvalidCredentials);
        }

        let access_token = self.tokens.issue_access(user.id)?;
        let refresh_token = self.tokens.issue_refresh();
        self.store
            .save_refresh_token(RefreshTokenRecord {
                user_id: user.id,
                token: refresh_token.clone(),
                expires_at: self.tokens.refresh_expiry(Utc::now()),
            })
            .await?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse {
            message: "login successful",
            access_token,
            refresh_token,
            user,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AccountError> {
        let update = ProfileUpdate {
            name: update.name.trim().to_string(),
            email: normalize_email(&update.email),
        };
        if update.name.is_empty() || update.email.is_empty() {
            return Err(AccountError::Validation(
                "name and email required".to_string(),
            ));
        }

        Ok(self.store.update_profile(user_id, &update).await?)
    }

    /// Record a missing-product request and credit the requesting user.
    pub async fn submit_product_request(
        &self,
        user_id: UserId,
        submission: ProductRequestSubmission,
    ) -> Result<ProductRequestReceipt, AccountError> {
        let submission = ProductRequestSubmission {
            barcode: submission.barcode.trim().to_string(),
            name: submission.name.trim().to_string(),
            brand_name: submission.brand_name.trim().to_string(),
            image_url: submission
                .image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        };
        if submission.barcode.is_empty() || submission.name.is_empty() {
            return Err(AccountError::Validation(
                "barcode and name are required".to_string(),
            ));
        }

        let (request, user) = self
            .store
            .record_product_request(user_id, submission, self.reward_points)
            .await?;

        info!(%user_id, barcode = %request.barcode, points = user.points, "product request recorded");
        Ok(ProductRequestReceipt {
            message: "request submitted successfully",
            request,
            points: user.points,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("email already in use")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(AccountStoreError),
}

impl From<AccountStoreError> for AccountError {
    fn from(value: AccountStoreError) -> Self {
        match value {
            AccountStoreError::Conflict => Self::EmailTaken,
            AccountStoreError::NotFound => Self::UserNotFound,
            other => Self::Store(other),
        }
    }
}
