//! Secure memory handling with automatic zeroization

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CipherError, Result};

/// Symmetric key size in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// 256-bit symmetric key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_SIZE],
}

impl SecretKey {
    /// Create a new key from raw bytes
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != KEY_SIZE {
            return None;
        }
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    /// Encode the raw key bytes as standard base64 for text storage.
    ///
    /// The encoded form carries no algorithm or version tag; the consumer
    /// must know out-of-band which algorithm the key belongs to.
    pub fn encode(&self) -> String {
        BASE64.encode(self.key)
    }

    /// Reconstruct a key from its base64 text form.
    ///
    /// Fails with [`CipherError::MalformedKey`] if the text is not valid
    /// base64 or the decoded length is not 32 bytes.
    pub fn decode(encoded: &str) -> Result<Self> {
        let mut decoded = BASE64
            .decode(encoded)
            .map_err(|e| CipherError::MalformedKey(format!("invalid base64: {}", e)))?;

        let key = Self::from_slice(&decoded).ok_or_else(|| {
            CipherError::MalformedKey(format!(
                "expected {} key bytes, got {}",
                KEY_SIZE,
                decoded.len()
            ))
        });
        decoded.zeroize();
        key
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        Self { key: self.key }
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Decrypted credential value - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Consume and return the inner value
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
