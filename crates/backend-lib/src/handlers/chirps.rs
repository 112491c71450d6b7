//! Chirp endpoints.
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chirpy_common::{ChirpQuery, ChirpResponse, CreateChirpRequest, SortDirection};
use metrics::counter;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::filter::clean_body;
use crate::metrics::{CHIRP_CREATED, CHIRP_DELETED};
use crate::models::Chirp;
use crate::storage::Storage;
use crate::validation::validate_chirp_body;
use crate::AppState;

/// `POST /api/chirps`
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn create_chirp<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChirpResponse>), AppError> {
    let Json(request) = payload?;
    let body = validate_chirp_body(&request.body)?;

    let chirp = state
        .storage
        .create_chirp(Chirp::new(clean_body(body), user_id))
        .await?;

    counter!(CHIRP_CREATED).increment(1);
    info!(chirp_id = %chirp.id, "chirp created");
    Ok((StatusCode::CREATED, Json(ChirpResponse::from(&chirp))))
}

/// `GET /api/chirps?author_id=<uuid>&sort=asc|desc`
pub async fn list_chirps<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ChirpQuery>, QueryRejection>,
) -> Result<Json<Vec<ChirpResponse>>, AppError> {
    let Query(query) = query?;
    let mut chirps = state.storage.list_chirps(query.author_id).await?;
    if query.sort == SortDirection::Desc {
        chirps.reverse();
    }

    Ok(Json(chirps.iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{id}`
pub async fn get_chirp<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ChirpResponse>, AppError> {
    let Path(id) = id?;
    let chirp = state.storage.get_chirp(id).await?;
    Ok(Json(ChirpResponse::from(&chirp)))
}

/// `DELETE /api/chirps/{id}`: only the author may delete
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn delete_chirp<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let chirp = state.storage.get_chirp(id).await?;
    if chirp.user_id != user_id {
        return Err(AppError::Forbidden(
            "only the author can delete a chirp".to_string(),
        ));
    }

    state.storage.delete_chirp(id, user_id).await?;
    counter!(CHIRP_DELETED).increment(1);
    info!(chirp_id = %id, "chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
