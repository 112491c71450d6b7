// ============================
// chirpy-backend-lib/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{admin, auth, chirps, health, users, webhooks};
use crate::middleware::count_hits;
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
pub fn create_router<S: Storage + Clone + 'static>(state: Arc<AppState<S>>) -> Router {
    // Only static file requests count as visits
    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.settings.assets_dir))
        .layer(from_fn_with_state(state.clone(), count_hits::<S>));

    let api = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/users", post(users::create_user::<S>).put(users::update_user::<S>))
        .route("/login", post(auth::login::<S>))
        .route("/refresh", post(auth::refresh::<S>))
        .route("/revoke", post(auth::revoke::<S>))
        .route(
            "/chirps",
            post(chirps::create_chirp::<S>).get(chirps::list_chirps::<S>),
        )
        .route(
            "/chirps/{id}",
            get(chirps::get_chirp::<S>).delete(chirps::delete_chirp::<S>),
        )
        .route("/polka/webhooks", post(webhooks::polka_webhook::<S>));

    let admin = Router::new()
        .route("/metrics", get(admin::metrics::<S>))
        .route("/reset", post(admin::reset::<S>));

    Router::new()
        .nest("/api", api)
        .nest("/admin", admin)
        .merge(files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
