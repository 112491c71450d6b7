//! User registration and update.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chirpy_common::{Credentials, UserResponse};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::models::User;
use crate::storage::Storage;
use crate::validation::{validate_email, validate_password};
use crate::AppState;

/// `POST /api/users`
#[instrument(skip_all)]
pub async fn create_user<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(credentials) = payload?;
    validate_email(&credentials.email)?;
    validate_password(&credentials.password)?;

    let password_hash = state.auth.hash_password(&credentials.password).await?;
    let user = state
        .storage
        .create_user(User::new(credentials.email, password_hash))
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// `PUT /api/users`: replace the caller's email and password
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn update_user<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(credentials) = payload?;
    validate_email(&credentials.email)?;
    validate_password(&credentials.password)?;

    let password_hash = state.auth.hash_password(&credentials.password).await?;
    let user = state
        .storage
        .update_user(user_id, &credentials.email, &password_hash)
        .await?;

    info!("user updated");
    Ok(Json(UserResponse::from(&user)))
}
