//! Payment provider webhook.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chirpy_common::{PolkaEvent, EVENT_USER_UPGRADED};
use metrics::counter;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::keys_match;
use crate::error::AppError;
use crate::extract::ApiKey;
use crate::metrics::USER_UPGRADED;
use crate::storage::Storage;
use crate::AppState;

/// `POST /api/polka/webhooks`
///
/// Only `user.upgraded` does anything; every other event is acknowledged with
/// 204 so the provider stops retrying.
#[instrument(skip_all)]
pub async fn polka_webhook<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiKey(key): ApiKey,
    payload: Result<Json<PolkaEvent>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    if !keys_match(&key, &state.settings.polka_key) {
        return Err(AppError::Unauthorized("invalid api key".to_string()));
    }

    let Json(event) = payload?;
    if event.event != EVENT_USER_UPGRADED {
        debug!(event = %event.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = Uuid::parse_str(&event.data.user_id)
        .map_err(|_| AppError::InvalidInput("user_id is not a valid id".to_string()))?;
    state.storage.upgrade_user(user_id).await?;

    counter!(USER_UPGRADED).increment(1);
    info!(%user_id, "user upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
