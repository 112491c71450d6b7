//! Default `AuthService` composed from the password hasher, the JWT issuer
//! and the refresh token store.
use async_trait::async_trait;
use chrono::Duration;
use metrics::counter;
use scrypt::Params;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::jwt::{issue_access_token, verify_access_token};
use super::password::{cost_params, hash_password_with, verify_password};
use super::refresh::RefreshTokenStore;
use super::{AuthError, AuthService, LoginOutcome};
use crate::config::AuthSettings;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, TOKEN_REFRESHED};
use crate::storage::Storage;

const BAD_CREDENTIALS: &str = "incorrect email or password";

pub struct DefaultAuth<S> {
    storage: S,
    refresh_tokens: RefreshTokenStore<S>,
    jwt_secret: String,
    access_ttl: Duration,
    password_params: Params,
}

impl<S: Storage + Clone> DefaultAuth<S> {
    pub fn new(storage: S, settings: &AuthSettings) -> anyhow::Result<Self> {
        let password_params = cost_params(settings.password_cost)?;
        let refresh_ttl = Duration::days(i64::try_from(settings.refresh_token_ttl_days)?);
        let access_ttl = Duration::seconds(i64::try_from(settings.access_token_ttl_secs)?);

        Ok(Self {
            refresh_tokens: RefreshTokenStore::new(storage.clone(), refresh_ttl),
            storage,
            jwt_secret: settings.jwt_secret.clone(),
            access_ttl,
            password_params,
        })
    }

    /// The underlying refresh token store
    pub fn refresh_tokens(&self) -> &RefreshTokenStore<S> {
        &self.refresh_tokens
    }
}

/// Run CPU-heavy password work off the async workers
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))
}

#[async_trait]
impl<S: Storage + Clone + 'static> AuthService for DefaultAuth<S> {
    async fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        let plain = plain.to_string();
        let params = self.password_params;
        blocking(move || hash_password_with(&plain, params))
            .await?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = match self.storage.get_user_by_email(email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                counter!(LOGIN_FAILED).increment(1);
                return Err(AuthError::Unauthorized(BAD_CREDENTIALS.to_string()));
            },
            Err(e) => return Err(AuthError::Store(e)),
        };

        let hash = user.password_hash.clone();
        let plain = password.to_string();
        if !blocking(move || verify_password(&hash, &plain)).await? {
            counter!(LOGIN_FAILED).increment(1);
            warn!(user_id = %user.id, "password mismatch");
            return Err(AuthError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let access_token = issue_access_token(user.id, &self.jwt_secret, self.access_ttl)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        counter!(LOGIN_SUCCEEDED).increment(1);
        info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        if !self.refresh_tokens.validate(refresh_token).await {
            return Err(AuthError::Unauthorized("invalid refresh token".to_string()));
        }

        let user_id = self.refresh_tokens.resolve_user(refresh_token).await?;
        let access_token = issue_access_token(user_id, &self.jwt_secret, self.access_ttl)?;

        counter!(TOKEN_REFRESHED).increment(1);
        info!(user_id = %user_id, "access token refreshed");
        Ok(access_token)
    }

    #[instrument(skip_all)]
    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await
    }

    fn authenticate(&self, access_token: &str) -> Result<Uuid, AuthError> {
        Ok(verify_access_token(access_token, &self.jwt_secret)?)
    }
}
