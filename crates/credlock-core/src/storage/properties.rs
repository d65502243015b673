//! `.properties`-style file storage backend
//!
//! Stores entries as `NAME=VALUE` lines in a plain text file, the format
//! the credential and key files use. Entries are cached in memory; `put`
//! persists immediately with an atomic temp-file rename.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{CipherError, Result};

/// Properties file storage backend
pub struct PropertiesFile {
    /// Path to the backing file
    path: PathBuf,
    /// In-memory cache of the entries
    cache: Arc<RwLock<PropertiesCache>>,
}

#[derive(Debug, Default)]
struct PropertiesCache {
    entries: HashMap<String, String>,
    /// Whether the cache has been modified since last save
    dirty: bool,
}

impl PropertiesFile {
    /// Create a store backed by the given file path.
    ///
    /// The file is not touched until [`load`](Self::load) or a write; a
    /// missing file simply means an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(RwLock::new(PropertiesCache::default())),
        }
    }

    /// Get the backing file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load entries from disk, replacing the in-memory cache
    pub async fn load(&self) -> Result<()> {
        if !self.path.exists() {
            debug!("No properties file at {:?}, starting empty", self.path);
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let entries = parse_properties(&contents)?;

        let mut cache = self.cache.write().await;
        debug!("Loaded {} entries from {:?}", entries.len(), self.path);
        cache.entries = entries;
        cache.dirty = false;
        Ok(())
    }

    /// Save entries to disk if the cache is dirty
    pub async fn save(&self) -> Result<()> {
        let mut cache = self.cache.write().await;

        if !cache.dirty {
            return Ok(());
        }

        let contents = format_properties(&cache.entries);

        // Write atomically using a temp file
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        cache.dirty = false;
        debug!("Saved {} entries to {:?}", cache.entries.len(), self.path);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PropertiesFile {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let cache = self.cache.read().await;
        Ok(cache.entries.get(name).cloned())
    }

    async fn put(&self, name: &str, value: &str) -> Result<()> {
        {
            let mut cache = self.cache.write().await;
            cache.entries.insert(name.to_string(), value.to_string());
            cache.dirty = true;
        }
        self.save().await
    }

    async fn contains(&self, name: &str) -> Result<bool> {
        let cache = self.cache.read().await;
        Ok(cache.entries.contains_key(name))
    }

    async fn names(&self) -> Result<Vec<String>> {
        let cache = self.cache.read().await;
        Ok(cache.entries.keys().cloned().collect())
    }
}

/// Parse `NAME=VALUE` lines; `#` and `!` start comment lines
fn parse_properties(contents: &str) -> Result<HashMap<String, String>> {
    let mut entries = HashMap::new();

    for (lineno, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let sep = find_separator(line).ok_or_else(|| {
            CipherError::StorageError(format!(
                "line {}: expected NAME=VALUE, got {:?}",
                lineno + 1,
                raw
            ))
        })?;

        let name = unescape(line[..sep].trim_end());
        let value = unescape(line[sep + 1..].trim_start());
        entries.insert(name, value);
    }

    Ok(entries)
}

/// Format entries as `NAME=VALUE` lines, sorted for stable output
fn format_properties(entries: &HashMap<String, String>) -> String {
    let mut names: Vec<&String> = entries.keys().collect();
    names.sort();

    let mut out = String::new();
    for name in names {
        out.push_str(&escape_name(name));
        out.push('=');
        out.push_str(&escape_value(&entries[name]));
        out.push('\n');
    }
    out
}

/// First unescaped `=` or `:` in a line
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            return Some(i);
        }
    }
    None
}

fn escape_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '=' | ':' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
