// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys, plus the admin hit counter.
use std::sync::atomic::{AtomicU64, Ordering};

pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const TOKEN_REFRESHED: &str = "auth.token.refreshed";
pub const REFRESH_TOKEN_ISSUED: &str = "auth.refresh_token.issued";
pub const REFRESH_TOKEN_REVOKED: &str = "auth.refresh_token.revoked";
pub const CHIRP_CREATED: &str = "chirp.created";
pub const CHIRP_DELETED: &str = "chirp.deleted";
pub const USER_UPGRADED: &str = "user.upgraded";
pub const FILESERVER_HIT: &str = "fileserver.hit";

/// Counts requests served from `/app/`. Shared by every request; reset from
/// the admin endpoint.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hit and return the new total
    pub fn increment(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}
