//! # credlock-core
//!
//! Symmetric credential encryption:
//! - AES-256-CBC envelope encryption with per-call random IVs
//! - PBKDF2-HMAC-SHA256 key derivation with zeroize-on-drop key material
//! - Base64 key encoding for text storage
//! - Properties-file key and credential stores with in-place encryption
//!
//! The cipher operations are synchronous, stateless, and safe to call
//! concurrently; only the storage collaborators do I/O.

pub mod crypto;
pub mod error;
pub mod keystore;
pub mod storage;
pub mod vault;

pub use crypto::{
    decrypt, decrypt_string, derive_key, encrypt, encrypt_string, generate_key, generate_salt,
    Envelope, SecretKey, SecretString,
};
pub use error::{CipherError, Result};
pub use keystore::{KeyStore, SECRET_KEY_ENTRY};
pub use storage::{KeyValueStore, PropertiesFile};
pub use vault::{CredentialVault, DEFAULT_FIELDS};
