// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the surface request handlers
//! use for everything credential related.
use async_trait::async_trait;
use uuid::Uuid;

use super::AuthError;
use crate::models::User;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash a password for storage
    async fn hash_password(&self, plain: &str) -> Result<String, AuthError>;

    /// Check credentials and mint a fresh access/refresh token pair
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Exchange a valid refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Revoke a refresh token
    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Resolve the user behind an access token
    fn authenticate(&self, access_token: &str) -> Result<Uuid, AuthError>;
}
