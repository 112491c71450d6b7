// ============================
// chirpy-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod bearer;
mod error;
pub mod jwt;
pub mod password;
pub mod refresh;
mod service;
mod service_impl;
pub mod token_generator;

pub use bearer::{extract_api_key, extract_bearer, keys_match};
pub use error::AuthError;
pub use jwt::{issue_access_token, verify_access_token, TokenError};
pub use password::{hash_password_with, verify_password};
pub use refresh::RefreshTokenStore;
pub use service::{AuthService, LoginOutcome};
pub use service_impl::DefaultAuth;
