use std::sync::Arc;

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use metrics::counter;

use crate::metrics::FILESERVER_HIT;
use crate::storage::Storage;
use crate::AppState;

/// Count every request routed to the static file server
pub async fn count_hits<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    state.hits.increment();
    counter!(FILESERVER_HIT).increment(1);

    next.run(request).await
}
