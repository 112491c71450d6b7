// ============================
// chirpy-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};

/// Default scrypt cost, log2(N)
pub const DEFAULT_PASSWORD_COST: u8 = 15;

/// Lowest cost accepted from configuration
pub const MIN_PASSWORD_COST: u8 = 1;

/// Highest cost accepted from configuration
pub const MAX_PASSWORD_COST: u8 = 20;

/// Build scrypt parameters for the given cost
pub fn cost_params(log_n: u8) -> anyhow::Result<Params> {
    if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&log_n) {
        anyhow::bail!(
            "scrypt cost must be between {MIN_PASSWORD_COST} and {MAX_PASSWORD_COST}, got {log_n}"
        );
    }
    Params::new(log_n, Params::RECOMMENDED_R, Params::RECOMMENDED_P, Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt cost {log_n}: {e}"))
}

/// Hash a password using scrypt with explicit parameters. Salt and cost are
/// embedded in the returned PHC string.
pub fn hash_password_with(plain: &str, params: Params) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash. Malformed hashes never match.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Params {
        cost_params(4).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password_with("securepassword123", cheap()).unwrap();
        assert_ne!(hash, "securepassword123");
        assert!(hash.starts_with("$scrypt$"));
        assert!(verify_password(&hash, "securepassword123"));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password_with("securepassword123", cheap()).unwrap();
        assert!(!verify_password(&hash, "wrongpassword"));
        assert!(!verify_password(&hash, ""));
    }

    #[test]
    fn test_salt_makes_hashes_differ() {
        let first = hash_password_with("pw123", cheap()).unwrap();
        let second = hash_password_with("pw123", cheap()).unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&first, "pw123"));
        assert!(verify_password(&second, "pw123"));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify_password("not-a-phc-string", "pw123"));
        assert!(!verify_password("", "pw123"));
        assert!(!verify_password("$scrypt$garbage", "pw123"));
    }

    #[test]
    fn test_cost_is_read_from_hash() {
        // a hash made at one cost still verifies whatever the current default is
        let hash = hash_password_with("pw123", cost_params(5).unwrap()).unwrap();
        assert!(hash.contains("ln=5"));
        assert!(verify_password(&hash, "pw123"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(cost_params(0).is_err());
        assert!(cost_params(MAX_PASSWORD_COST + 1).is_err());
        assert!(cost_params(DEFAULT_PASSWORD_COST).is_ok());
    }
}
