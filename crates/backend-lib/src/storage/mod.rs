// ============================
// chirpy-backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction with in-memory and flat-file implementations.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Chirp, RefreshToken, User};

mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStorage;

/// Errors raised by storage backends
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Trait for storage backends.
///
/// Each method touches a single record, and implementations make that
/// read-modify-write atomic. Nothing above this layer takes locks.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User, StorageError>;

    /// Fetch a user by id
    async fn get_user(&self, id: Uuid) -> Result<User, StorageError>;

    /// Fetch a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError>;

    /// Replace a user's email and password hash
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StorageError>;

    /// Mark a user as Chirpy Red
    async fn upgrade_user(&self, id: Uuid) -> Result<User, StorageError>;

    /// Delete every user together with their chirps and refresh tokens
    async fn delete_users(&self) -> Result<(), StorageError>;

    /// Insert a new chirp
    async fn create_chirp(&self, chirp: Chirp) -> Result<Chirp, StorageError>;

    /// Fetch a chirp by id
    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StorageError>;

    /// List chirps oldest first, optionally restricted to one author
    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StorageError>;

    /// Delete a chirp owned by `user_id`
    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<(), StorageError>;

    /// Persist a freshly issued refresh token
    async fn create_refresh_token(&self, token: RefreshToken) -> Result<(), StorageError>;

    /// Look up a refresh token regardless of its state
    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StorageError>;

    /// Set `revoked_at` on a refresh token. An already revoked token keeps
    /// its original timestamp.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<RefreshToken, StorageError>;
}

pub(crate) fn sort_oldest_first(chirps: &mut [Chirp]) {
    chirps.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
