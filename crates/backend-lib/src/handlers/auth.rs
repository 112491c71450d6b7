//! Login and token lifecycle endpoints.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chirpy_common::{Credentials, LoginResponse, RefreshResponse, UserResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::extract::BearerToken;
use crate::storage::Storage;
use crate::AppState;

/// `POST /api/login`
#[instrument(skip_all)]
pub async fn login<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(credentials) = payload?;
    let outcome = state
        .auth
        .login(&credentials.email, &credentials.password)
        .await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&outcome.user),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// `POST /api/refresh`: bearer refresh token in, new access token out
#[instrument(skip_all)]
pub async fn refresh<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(refresh_token): BearerToken,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = state.auth.refresh(&refresh_token).await?;
    Ok(Json(RefreshResponse { token }))
}

/// `POST /api/revoke`
#[instrument(skip_all)]
pub async fn revoke<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(refresh_token): BearerToken,
) -> Result<StatusCode, AppError> {
    state.auth.revoke(&refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
