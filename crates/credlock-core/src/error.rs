//! Error types for credlock-core

use thiserror::Error;

/// Result type alias for cipher and storage operations
pub type Result<T> = std::result::Result<T, CipherError>;

/// Cipher and collaborator error types
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Crypto backend unavailable: {0}")]
    CryptoUnavailable(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Key encoding failed: {0}")]
    EncodingError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Property '{0}' not found or empty")]
    PropertyNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
