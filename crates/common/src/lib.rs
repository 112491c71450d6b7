// ================
// common/src/lib.rs
// ================
//! Wire types shared between the Chirpy server and its clients.
//!
//! Every request and response body the HTTP API speaks is defined here so the
//! server and the integration tests agree on field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Webhook event that marks a user as upgraded to Chirpy Red
pub const EVENT_USER_UPGRADED: &str = "user.upgraded";

/// Email + password body used by registration, login and user update
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Short-lived JWT access token
    pub token: String,
    /// Opaque long-lived refresh token
    pub refresh_token: String,
}

/// Response to a successful refresh
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshResponse {
    pub token: String,
}

/// Body of `POST /api/chirps`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Public view of a chirp
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordering of chirp listings by creation time
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Query string of `GET /api/chirps`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChirpQuery {
    /// Only list chirps by this author
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortDirection,
}

/// Payload posted by the Polka payment provider
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PolkaEvent {
    pub event: String,
    pub data: PolkaEventData,
}

/// Event data. `user_id` stays a string so a bad id can be reported as a
/// client error instead of a body rejection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PolkaEventData {
    pub user_id: String,
}
