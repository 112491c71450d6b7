// ============================
// chirpy-backend-lib/src/auth/refresh.rs
// ============================
//! Opaque refresh tokens persisted with expiry and revocation state.
//!
//! A token is `Active` until it either expires or is revoked. Both are
//! terminal: nothing brings a token back.
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tracing::{debug, warn};
use uuid::Uuid;

use super::token_generator::generate_secure_token;
use super::AuthError;
use crate::metrics::{REFRESH_TOKEN_ISSUED, REFRESH_TOKEN_REVOKED};
use crate::models::RefreshToken;
use crate::storage::Storage;

/// Default refresh token lifetime in days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Issues, validates and revokes refresh tokens on top of a storage backend
#[derive(Clone)]
pub struct RefreshTokenStore<S> {
    storage: S,
    ttl: Duration,
}

impl<S: Storage> RefreshTokenStore<S> {
    pub fn new(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    /// Mint and persist a new token for `user_id`
    pub async fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let token = generate_secure_token().map_err(|e| AuthError::Internal(e.to_string()))?;
        let now = Utc::now();
        let record = RefreshToken {
            token: token.clone(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + self.ttl,
            revoked_at: None,
        };

        self.storage
            .create_refresh_token(record)
            .await
            .map_err(AuthError::Store)?;

        counter!(REFRESH_TOKEN_ISSUED).increment(1);
        Ok(token)
    }

    /// True only for a known, unrevoked, unexpired token
    pub async fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Utc::now()).await
    }

    /// Same as [`validate`](Self::validate) against an explicit clock
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.storage.get_refresh_token(token).await {
            Ok(record) => {
                if record.is_revoked() {
                    debug!(user_id = %record.user_id, "refresh token was revoked");
                    false
                } else if record.is_expired_at(now) {
                    debug!(user_id = %record.user_id, "refresh token has expired");
                    false
                } else {
                    true
                }
            },
            Err(e) if e.is_not_found() => {
                debug!("unknown refresh token presented");
                false
            },
            Err(e) => {
                warn!(error = %e, "refresh token lookup failed");
                false
            },
        }
    }

    /// Mark a token revoked. Revoking twice keeps the first timestamp.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let record = self.storage.revoke_refresh_token(token, Utc::now()).await?;
        counter!(REFRESH_TOKEN_REVOKED).increment(1);
        debug!(user_id = %record.user_id, "refresh token revoked");
        Ok(())
    }

    /// Owner of a token, whatever its state. Callers must validate first
    /// before trusting the identity.
    pub async fn resolve_user(&self, token: &str) -> Result<Uuid, AuthError> {
        let record = self.storage.get_refresh_token(token).await?;
        Ok(record.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::storage::MemoryStorage;

    async fn setup(ttl: Duration) -> (RefreshTokenStore<MemoryStorage>, Uuid) {
        let storage = MemoryStorage::new();
        let user = storage
            .create_user(User::new("a@b.com".to_string(), "hash".to_string()))
            .await
            .unwrap();
        (RefreshTokenStore::new(storage, ttl), user.id)
    }

    #[tokio::test]
    async fn test_issue_and_validate() {
        let (store, user_id) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;

        let token = store.issue(user_id).await.unwrap();
        assert_eq!(token.len(), 64);
        assert!(store.validate(&token).await);
        assert_eq!(store.resolve_user(&token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_login_tokens_are_independent() {
        let (store, user_id) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;

        let first = store.issue(user_id).await.unwrap();
        let second = store.issue(user_id).await.unwrap();
        assert_ne!(first, second);

        store.revoke(&first).await.unwrap();
        assert!(!store.validate(&first).await);
        assert!(store.validate(&second).await);
    }

    #[tokio::test]
    async fn test_revoked_token_is_invalid_before_expiry() {
        let (store, user_id) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;
        let token = store.issue(user_id).await.unwrap();

        store.revoke(&token).await.unwrap();

        assert!(!store.validate(&token).await);
        // identity stays resolvable for auditing
        assert_eq!(store.resolve_user(&token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let (store, user_id) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;
        let token = store.issue(user_id).await.unwrap();

        let later = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS) + Duration::seconds(1);
        assert!(!store.validate_at(&token, later).await);

        let (short_lived, user_id) = setup(Duration::seconds(-1)).await;
        let token = short_lived.issue(user_id).await.unwrap();
        assert!(!short_lived.validate(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (store, _) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;

        assert!(!store.validate("deadbeef").await);
        assert!(matches!(
            store.revoke("deadbeef").await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            store.resolve_user("deadbeef").await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_double_revoke_succeeds() {
        let (store, user_id) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;
        let token = store.issue(user_id).await.unwrap();

        store.revoke(&token).await.unwrap();
        store.revoke(&token).await.unwrap();
        assert!(!store.validate(&token).await);
    }

    #[tokio::test]
    async fn test_issue_for_unknown_user_is_store_error() {
        let (store, _) = setup(Duration::days(REFRESH_TOKEN_TTL_DAYS)).await;
        assert!(matches!(
            store.issue(Uuid::new_v4()).await,
            Err(AuthError::Store(_))
        ));
    }
}
