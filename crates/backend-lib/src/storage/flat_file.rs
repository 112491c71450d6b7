// ============================
// chirpy-backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file implementation of the Storage trait.
//!
//! Layout under the root directory:
//! - `users/<id>.json`
//! - `chirps/<id>.json`
//! - `refresh-tokens/<token>.json`
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};
use uuid::Uuid;

use super::{sort_oldest_first, Storage, StorageError};
use crate::auth::token_generator::DEFAULT_TOKEN_BYTES;
use crate::models::{Chirp, RefreshToken, User};

const USERS_DIR: &str = "users";
const CHIRPS_DIR: &str = "chirps";
const REFRESH_TOKENS_DIR: &str = "refresh-tokens";

/// Flat-file storage, one JSON document per record
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    /// Serialises writers so check-then-write sequences stay atomic
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(USERS_DIR))?;
        fs::create_dir_all(root.join(CHIRPS_DIR))?;
        fs::create_dir_all(root.join(REFRESH_TOKENS_DIR))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn user_path(&self, id: Uuid) -> PathBuf {
        self.root.join(USERS_DIR).join(format!("{id}.json"))
    }

    fn chirp_path(&self, id: Uuid) -> PathBuf {
        self.root.join(CHIRPS_DIR).join(format!("{id}.json"))
    }

    /// Tokens come straight from request headers, so anything that is not
    /// shaped like a generated token is rejected before it reaches the
    /// filesystem.
    fn refresh_token_path(&self, token: &str) -> Option<PathBuf> {
        let well_formed = token.len() == 2 * DEFAULT_TOKEN_BYTES
            && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return None;
        }
        Some(self.root.join(REFRESH_TOKENS_DIR).join(format!("{token}.json")))
    }

    async fn read_all<T: DeserializeOwned>(&self, dir: &str) -> Result<Vec<T>, StorageError> {
        let mut records = Vec::new();
        let mut entries = tokio_fs::read_dir(self.root.join(dir)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio_fs::read_to_string(&path).await?;
            records.push(serde_json::from_str(&content)?);
        }
        Ok(records)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let users: Vec<User> = self.read_all(USERS_DIR).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn clear_dir(&self, dir: &str) -> Result<(), StorageError> {
        let mut entries = tokio_fs::read_dir(self.root.join(dir)).await?;
        while let Some(entry) = entries.next_entry().await? {
            tokio_fs::remove_file(entry.path()).await?;
        }
        Ok(())
    }
}

async fn read_record<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, StorageError> {
    match tokio_fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StorageError::NotFound(what.to_string()))
        },
        Err(e) => Err(e.into()),
    }
}

/// Write to a sibling temp file and rename over the target
async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    tokio_fs::write(&tmp, json).await?;
    tokio_fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn create_user(&self, user: User) -> Result<User, StorageError> {
        let _guard = self.write_lock.lock().await;
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(StorageError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        write_record(&self.user_path(user.id), &user).await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StorageError> {
        read_record(&self.user_path(id), &format!("user {id}")).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError> {
        self.find_user_by_email(email)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user with email {email}")))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut user = self.get_user(id).await?;
        if let Some(other) = self.find_user_by_email(email).await? {
            if other.id != id {
                return Err(StorageError::Conflict(format!(
                    "email {email} already registered"
                )));
            }
        }
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        write_record(&self.user_path(id), &user).await?;
        Ok(user)
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut user = self.get_user(id).await?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        write_record(&self.user_path(id), &user).await?;
        Ok(user)
    }

    async fn delete_users(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.clear_dir(REFRESH_TOKENS_DIR).await?;
        self.clear_dir(CHIRPS_DIR).await?;
        self.clear_dir(USERS_DIR).await?;
        Ok(())
    }

    async fn create_chirp(&self, chirp: Chirp) -> Result<Chirp, StorageError> {
        let _guard = self.write_lock.lock().await;
        self.get_user(chirp.user_id).await?;
        write_record(&self.chirp_path(chirp.id), &chirp).await?;
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StorageError> {
        read_record(&self.chirp_path(id), &format!("chirp {id}")).await
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        let mut chirps: Vec<Chirp> = self.read_all(CHIRPS_DIR).await?;
        if let Some(author) = author {
            chirps.retain(|c| c.user_id == author);
        }
        sort_oldest_first(&mut chirps);
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let chirp = self.get_chirp(id).await?;
        if chirp.user_id != user_id {
            return Err(StorageError::NotFound(format!("chirp {id}")));
        }
        tokio_fs::remove_file(self.chirp_path(id)).await?;
        Ok(())
    }

    async fn create_refresh_token(&self, token: RefreshToken) -> Result<(), StorageError> {
        let path = self
            .refresh_token_path(&token.token)
            .ok_or_else(|| {
                StorageError::Conflict("refresh token is not a generated token".to_string())
            })?;
        let _guard = self.write_lock.lock().await;
        self.get_user(token.user_id).await?;
        write_record(&path, &token).await
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StorageError> {
        let path = self
            .refresh_token_path(token)
            .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))?;
        read_record(&path, "refresh token").await
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<RefreshToken, StorageError> {
        let path = self
            .refresh_token_path(token)
            .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))?;
        let _guard = self.write_lock.lock().await;
        let mut record: RefreshToken = read_record(&path, "refresh token").await?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(at);
            record.updated_at = at;
            write_record(&path, &record).await?;
        }
        Ok(record)
    }
}
