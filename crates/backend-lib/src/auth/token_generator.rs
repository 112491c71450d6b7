// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Secure token generation for refresh tokens
Tokens are raw OS entropy, hex encoded, so they are safe to use as file
names and in headers without escaping. */
use rand::{rngs::OsRng, TryRngCore};

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/** Generate a cryptographically secure random token
# Returns
A lowercase hex string of `2 * DEFAULT_TOKEN_BYTES` characters */
pub fn generate_secure_token() -> anyhow::Result<String> {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> anyhow::Result<String> {
    let mut buffer = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| anyhow::anyhow!("OS entropy source failed: {e}"))?;
    Ok(hex::encode(buffer))
}
