//! Credential vault: in-place encryption of named store entries

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::crypto::{decrypt_string, encrypt_string, SecretKey, SecretString};
use crate::error::{CipherError, Result};
use crate::storage::KeyValueStore;

/// Field names the stock credential sweep covers
pub const DEFAULT_FIELDS: [&str; 3] = ["URL", "USERNAME", "PASSWORD"];

/// Encrypts and decrypts named entries of a credential store in-place.
///
/// An encrypted value replaces the plaintext under the same entry name;
/// nothing in the stored text marks which state an entry is in, so running
/// the sweep twice double-encrypts.
pub struct CredentialVault {
    store: Arc<dyn KeyValueStore>,
    key: SecretKey,
}

impl CredentialVault {
    /// Create a vault over the given store and key
    pub fn new(store: Arc<dyn KeyValueStore>, key: SecretKey) -> Self {
        Self { store, key }
    }

    /// Encrypt one field in-place.
    ///
    /// Returns `false` without touching the store when the field is
    /// absent, so a partial credential file still encrypts cleanly.
    pub async fn encrypt_field(&self, name: &str) -> Result<bool> {
        let Some(value) = self.store.get(name).await? else {
            warn!("Field '{}' not present, skipping encryption", name);
            return Ok(false);
        };

        let envelope = encrypt_string(&value, &self.key)?;
        self.store.put(name, &envelope).await?;

        debug!("Encrypted field '{}'", name);
        Ok(true)
    }

    /// Encrypt each of the given fields in-place, skipping absent ones.
    /// Returns the names that were actually encrypted.
    pub async fn encrypt_fields(&self, names: &[&str]) -> Result<Vec<String>> {
        let mut encrypted = Vec::new();
        for name in names {
            if self.encrypt_field(name).await? {
                encrypted.push(name.to_string());
            }
        }

        info!("Encrypted {} of {} fields", encrypted.len(), names.len());
        Ok(encrypted)
    }

    /// Decrypt one field and return the plaintext, zeroed on drop.
    ///
    /// Fails with [`CipherError::PropertyNotFound`] if the field is
    /// missing or empty.
    pub async fn decrypt_field(&self, name: &str) -> Result<SecretString> {
        let envelope = self
            .store
            .get(name)
            .await?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CipherError::PropertyNotFound(name.to_string()))?;

        let plaintext = decrypt_string(&envelope, &self.key)?;
        debug!("Decrypted field '{}'", name);
        Ok(SecretString::new(plaintext))
    }
}
