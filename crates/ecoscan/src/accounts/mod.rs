//! User accounts: registration, login with JWT access tokens, profile edits,
//! and rewarded product requests.

pub mod auth;
pub mod claims;
pub mod domain;
pub mod memory;
pub mod password;
pub mod router;
pub mod service;
pub mod store;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use auth::{require_auth, AuthenticatedUser};
pub use claims::{decode_user_id, ClaimFormatError};
pub use domain::{
    LoginRequest, LoginResponse, NewUser, ProductRequestReceipt, ProductRequestRecord,
    ProductRequestSubmission, ProfileUpdate, RefreshTokenRecord, RegisterRequest, User, UserId,
};
pub use memory::InMemoryAccountStore;
pub use password::{
    hash_password, hash_password_async, verify_password, verify_password_async, PasswordError,
    MIN_PASSWORD_LENGTH,
};
pub use router::account_router;
pub use service::{AccountError, AccountService};
pub use store::{AccountStore, AccountStoreError};
pub use tokens::{TokenError, TokenService};
