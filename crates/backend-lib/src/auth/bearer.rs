//! `Authorization` header parsing.
use super::AuthError;

/// Scheme carrying access and refresh tokens
pub const BEARER_SCHEME: &str = "Bearer";

/// Scheme carrying the webhook provider's API key
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Pull the credential out of `"<scheme> <credential>"`.
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored, so `"  bearer   abc123  "` yields `"abc123"`.
pub fn extract_credential<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let value = header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::Unauthorized("authorization header is missing".to_string()))?;

    let missing_scheme =
        || AuthError::Unauthorized(format!("authorization header is missing the '{scheme}' prefix"));

    let prefix = value.get(..scheme.len()).ok_or_else(missing_scheme)?;
    let rest = value.get(scheme.len()..).ok_or_else(missing_scheme)?;
    if !prefix.eq_ignore_ascii_case(scheme) || !rest.starts_with(char::is_whitespace) {
        return Err(missing_scheme());
    }

    let credential = rest.trim();
    if credential.is_empty() {
        return Err(AuthError::Unauthorized(
            "authorization header carries no credential".to_string(),
        ));
    }
    Ok(credential)
}

/// Extract a bearer token from an `Authorization` header value
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    extract_credential(header, BEARER_SCHEME)
}

/// Extract an API key from an `Authorization` header value
pub fn extract_api_key(header: Option<&str>) -> Result<&str, AuthError> {
    extract_credential(header, API_KEY_SCHEME)
}

/// Compare a presented key with the expected one without an early exit on
/// the first differing byte. Only the length leaks.
pub fn keys_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
