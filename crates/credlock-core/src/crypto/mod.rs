//! Cryptographic primitives for credential encryption
//!
//! This module provides:
//! - AES-256-CBC envelope encryption (random IV, PKCS#7 padding)
//! - PBKDF2-HMAC-SHA256 key derivation from passwords
//! - Secure memory handling with zeroize

mod cipher;
mod key_derivation;
mod secure_memory;

pub use cipher::{decrypt, decrypt_string, encrypt, encrypt_string, Envelope, IV_SIZE};
pub use key_derivation::{
    derive_key, generate_key, generate_salt, PBKDF2_ITERATIONS, SALT_SIZE,
};
pub use secure_memory::{SecretKey, SecretString, KEY_SIZE};
