use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::domain::{
    NewUser, ProductRequestRecord, ProductRequestSubmission, ProfileUpdate, RefreshTokenRecord,
    User, UserId,
};
use super::store::{AccountStore, AccountStoreError};

#[derive(Default)]
struct AccountState {
    users: BTreeMap<UserId, User>,
    refresh_tokens: HashMap<UserId, RefreshTokenRecord>,
    requests: Vec<ProductRequestRecord>,
    last_user_id: i64,
    last_request_id: u64,
}

/// Process-local account store; one lock keeps request + points updates atomic.
#[derive(Default)]
pub struct InMemoryAccountStore {
    state: Mutex<AccountState>,
}

impl InMemoryAccountStore {
    pub fn refresh_token_for(&self, id: UserId) -> Option<RefreshTokenRecord> {
        self.state.lock().refresh_tokens.get(&id).cloned()
    }

    pub fn requests(&self) -> Vec<ProductRequestRecord> {
        self.state.lock().requests.clone()
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.state.lock().users.get(&id).cloned()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AccountStoreError> {
        let mut state = self.state.lock();
        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(AccountStoreError::Conflict);
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let record = User {
            id: UserId(state.last_user_id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            points: 0,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AccountStoreError> {
        let state = self.state.lock();
        Ok(state.users.values().find(|user| user.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, AccountStoreError> {
        let mut state = self.state.lock();
        if state
            .users
            .values()
            .any(|other| other.id != id && other.email == update.email)
        {
            return Err(AccountStoreError::Conflict);
        }

        let user = state.users.get_mut(&id).ok_or(AccountStoreError::NotFound)?;
        user.name = update.name.clone();
        user.email = update.email.clone();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn save_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), AccountStoreError> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&record.user_id) {
            return Err(AccountStoreError::NotFound);
        }
        state.refresh_tokens.insert(record.user_id, record);
        Ok(())
    }

    async fn record_product_request(
        &self,
        user_id: UserId,
        submission: ProductRequestSubmission,
        reward_points: i64,
    ) -> Result<(ProductRequestRecord, User), AccountStoreError> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&user_id) {
            return Err(AccountStoreError::NotFound);
        }

        state.last_request_id += 1;
        let now = Utc::now();
        let request = ProductRequestRecord {
            id: state.last_request_id,
            user_id,
            barcode: submission.barcode,
            name: submission.name,
            brand_name: submission.brand_name,
            image_url: submission.image_url,
            created_at: now,
        };
        state.requests.push(request.clone());

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(AccountStoreError::NotFound)?;
        user.points += reward_points;
        user.updated_at = now;
        let user = user.clone();

        Ok((request, user))
    }
}
