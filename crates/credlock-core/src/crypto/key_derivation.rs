//! Key generation and password-based key derivation (PBKDF2-HMAC-SHA256)

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use super::{SecretKey, KEY_SIZE};
use crate::error::{CipherError, Result};

/// PBKDF2 iteration count.
///
/// Fixed at 65536: changing it changes every derived key, so keys already
/// persisted by other deployments would stop matching.
pub const PBKDF2_ITERATIONS: u32 = 65536;

/// Default salt size in bytes for [`generate_salt`]
pub const SALT_SIZE: usize = 16;

/// Generate a fresh 256-bit key from the OS random source
pub fn generate_key() -> Result<SecretKey> {
    let mut key = [0u8; KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| CipherError::CryptoUnavailable(format!("OS random source: {}", e)))?;
    Ok(SecretKey::new(key))
}

/// Derive a 256-bit key from a password using PBKDF2-HMAC-SHA256
///
/// The salt is caller-supplied; whoever manages password-derived keys owns
/// salt generation and persistence. Deterministic: the same password and
/// salt always derive the same key.
pub fn derive_key(password: &str, salt: &[u8]) -> Result<SecretKey> {
    if salt.is_empty() {
        return Err(CipherError::CryptoUnavailable(
            "empty salt for key derivation".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    Ok(SecretKey::new(key))
}

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> Result<[u8; SALT_SIZE]> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CipherError::CryptoUnavailable(format!("OS random source: {}", e)))?;
    Ok(salt)
}
