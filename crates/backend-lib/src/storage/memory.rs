//! In-memory storage backed by concurrent maps.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::{sort_oldest_first, Storage, StorageError};
use crate::models::{Chirp, RefreshToken, User};

/// Storage that lives for the lifetime of the process. Clones share data.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    users: Arc<DashMap<Uuid, User>>,
    /// email -> user id, doubles as the uniqueness constraint
    emails: Arc<DashMap<String, Uuid>>,
    chirps: Arc<DashMap<Uuid, Chirp>>,
    refresh_tokens: Arc<DashMap<String, RefreshToken>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `email` for `id`. Returns false if another user holds it.
    fn claim_email(&self, email: &str, id: Uuid) -> bool {
        let owner = *self.emails.entry(email.to_string()).or_insert(id);
        owner == id
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, StorageError> {
        if !self.claim_email(&user.email, user.id) {
            return Err(StorageError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StorageError> {
        self.users
            .get(&id)
            .map(|u| u.clone())
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError> {
        let id = self
            .emails
            .get(email)
            .map(|id| *id)
            .ok_or_else(|| StorageError::NotFound(format!("user with email {email}")))?;
        self.get_user(id).await
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let old_email = self.get_user(id).await?.email;

        if old_email != email {
            if !self.claim_email(email, id) {
                return Err(StorageError::Conflict(format!(
                    "email {email} already registered"
                )));
            }
            self.emails.remove(&old_email);
        }

        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StorageError> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_users(&self) -> Result<(), StorageError> {
        self.refresh_tokens.clear();
        self.chirps.clear();
        self.emails.clear();
        self.users.clear();
        Ok(())
    }

    async fn create_chirp(&self, chirp: Chirp) -> Result<Chirp, StorageError> {
        if !self.users.contains_key(&chirp.user_id) {
            return Err(StorageError::NotFound(format!("user {}", chirp.user_id)));
        }
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StorageError> {
        self.chirps
            .get(&id)
            .map(|c| c.clone())
            .ok_or_else(|| StorageError::NotFound(format!("chirp {id}")))
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |a| c.user_id == a))
            .map(|c| c.clone())
            .collect();
        sort_oldest_first(&mut chirps);
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<(), StorageError> {
        self.chirps
            .remove_if(&id, |_, c| c.user_id == user_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("chirp {id}")))
    }

    async fn create_refresh_token(&self, token: RefreshToken) -> Result<(), StorageError> {
        if !self.users.contains_key(&token.user_id) {
            return Err(StorageError::NotFound(format!("user {}", token.user_id)));
        }
        self.refresh_tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StorageError> {
        self.refresh_tokens
            .get(token)
            .map(|t| t.clone())
            .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<RefreshToken, StorageError> {
        let mut record = self
            .refresh_tokens
            .get_mut(token)
            .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(at);
            record.updated_at = at;
        }
        Ok(record.clone())
    }
}
