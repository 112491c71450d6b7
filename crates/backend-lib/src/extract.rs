//! Request extractors for the `Authorization` header.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::auth::{extract_api_key, extract_bearer};
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Raw bearer credential; an access or refresh token depending on the route
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<St: Send + Sync> FromRequestParts<St> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(authorization(parts))?;
        Ok(Self(token.to_string()))
    }
}

/// Webhook API key from `Authorization: ApiKey <key>`
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl<St: Send + Sync> FromRequestParts<St> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let key = extract_api_key(authorization(parts))?;
        Ok(Self(key.to_string()))
    }
}

/// The user behind a verified access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl<S: Storage + 'static> FromRequestParts<Arc<AppState<S>>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(authorization(parts))?;
        let user_id = state.auth.authenticate(token)?;
        Ok(Self(user_id))
    }
}
