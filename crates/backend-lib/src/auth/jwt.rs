//! Access tokens: HS256 JWTs signed with the server secret.
//!
//! Access tokens are stateless. Nothing revokes them; a short TTL bounds how
//! long a leaked token stays useful, and sessions end by revoking the refresh
//! token instead.
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Value of the `iss` claim on every token this service issues
pub const TOKEN_ISSUER: &str = "chirpy";

/// Default access token lifetime in seconds
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second differ
    pub jti: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issue a signed access token for `user_id` that expires after `ttl`.
/// A negative `ttl` yields a token that is already expired.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Check signature, issuer and expiry, returning the subject
pub fn verify_access_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        other => TokenError::Malformed(format!("{other:?}")),
    })?;

    // jsonwebtoken only rejects `exp < now`; a token is dead once `now >= exp`
    if data.claims.exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| TokenError::Malformed("subject is not a user id".to_string()))
}
