//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for named text entry stores (key store, credential store)
///
/// Both collaborators the cipher core works against share this shape: a
/// flat set of named string entries. Encryption replaces an entry's value
/// in-place under the same name, never under a new one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value for a property name, if present
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Store a value under a property name, replacing any previous value
    async fn put(&self, name: &str, value: &str) -> Result<()>;

    /// Check if a property name exists
    async fn contains(&self, name: &str) -> Result<bool>;

    /// List all property names
    async fn names(&self) -> Result<Vec<String>>;
}
