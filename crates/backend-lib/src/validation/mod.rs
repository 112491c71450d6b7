// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Longest chirp accepted, in characters
pub const MAX_CHIRP_LENGTH: usize = 140;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid chirp: {0}")]
    InvalidChirp(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email must not be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email format is invalid".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password must not be empty".to_string(),
        ));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}

/// Validate a chirp body before filtering
pub fn validate_chirp_body(body: &str) -> ValidationResult<&str> {
    if body.trim().is_empty() {
        return Err(ValidationError::InvalidChirp(
            "Chirp must not be empty".to_string(),
        ));
    }

    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::InvalidChirp("Chirp is too long".to_string()));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("walt+test@breakingbad.example").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email(&format!("{}@b.com", "a".repeat(MAX_EMAIL_LENGTH))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pw123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert!(validate_password(&"é".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert!(validate_password(&"é".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_chirp_body() {
        assert!(validate_chirp_body("hello world").is_ok());
        assert!(validate_chirp_body(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());

        assert_eq!(
            validate_chirp_body(&"a".repeat(MAX_CHIRP_LENGTH + 1)),
            Err(ValidationError::InvalidChirp("Chirp is too long".to_string()))
        );
        assert!(validate_chirp_body("   ").is_err());
    }

    #[test]
    fn test_chirp_length_counts_characters() {
        // 140 multi-byte characters are still within the limit
        assert!(validate_chirp_body(&"é".repeat(MAX_CHIRP_LENGTH)).is_ok());
    }
}
