//! Key store: persists the encoded secret key as a single text entry

use std::sync::Arc;
use tracing::{debug, info};

use crate::crypto::SecretKey;
use crate::error::{CipherError, Result};
use crate::storage::KeyValueStore;

/// Entry name the encoded key is stored under
pub const SECRET_KEY_ENTRY: &str = "SECRET_KEY";

/// Persists one encoded key in a text key-value store
pub struct KeyStore {
    store: Arc<dyn KeyValueStore>,
}

impl KeyStore {
    /// Create a key store over the given backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Encode the key and persist it under `SECRET_KEY`
    pub async fn save_key(&self, key: &SecretKey) -> Result<()> {
        let encoded = key.encode();
        if encoded.is_empty() {
            return Err(CipherError::EncodingError(
                "refusing to store an empty encoded key".to_string(),
            ));
        }

        self.store.put(SECRET_KEY_ENTRY, &encoded).await?;
        info!("Secret key written to key store");
        Ok(())
    }

    /// Load and decode the persisted key
    ///
    /// Fails with [`CipherError::PropertyNotFound`] if the entry is
    /// missing or empty, [`CipherError::MalformedKey`] if it does not
    /// decode to 32 key bytes.
    pub async fn load_key(&self) -> Result<SecretKey> {
        let encoded = self
            .store
            .get(SECRET_KEY_ENTRY)
            .await?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CipherError::PropertyNotFound(SECRET_KEY_ENTRY.to_string()))?;

        let key = SecretKey::decode(&encoded)?;
        debug!("Secret key loaded from key store");
        Ok(key)
    }

    /// Check whether a key has been persisted
    pub async fn has_key(&self) -> Result<bool> {
        Ok(self
            .store
            .get(SECRET_KEY_ENTRY)
            .await?
            .is_some_and(|v| !v.is_empty()))
    }
}
