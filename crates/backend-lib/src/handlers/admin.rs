//! Admin endpoints.
use std::sync::Arc;

use axum::{extract::State, response::Html};
use tracing::{info, warn};

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `GET /admin/metrics`
pub async fn metrics<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Html<String> {
    Html(format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>
"#,
        state.hits.get()
    ))
}

/// `POST /admin/reset`: zero the hit counter and delete every user. Refused
/// outside the `dev` platform.
pub async fn reset<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<&'static str, AppError> {
    if !state.settings.is_dev() {
        warn!(platform = %state.settings.platform, "reset refused");
        return Err(AppError::Forbidden(
            "reset is only allowed on the dev platform".to_string(),
        ));
    }

    state.hits.reset();
    state.storage.delete_users().await?;

    info!("hits and users reset");
    Ok("OK")
}
