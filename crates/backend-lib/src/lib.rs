// ============================
// chirpy-backend-lib/src/lib.rs
// ============================
//! Core library for the Chirpy HTTP server.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::metrics::HitCounter;
use crate::storage::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Storage backend
    pub storage: S,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Requests served from `/app/`
    pub hits: Arc<HitCounter>,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        let auth = Arc::new(DefaultAuth::new(storage.clone(), &settings.auth)?);

        Ok(Self {
            auth,
            storage,
            settings: Arc::new(settings),
            hits: Arc::new(HitCounter::new()),
        })
    }
}
