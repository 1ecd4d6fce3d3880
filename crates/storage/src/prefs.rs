use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::repository::{DeckBackend, StorageError};

/// Key the deck payload is stored under, matching the app's preference entry.
pub const CARDS_KEY: &str = "Cards";

/// Deck backend over a process-wide key-value preference store.
///
/// Clones share the same underlying map, so one constructed at startup and
/// handed to every collaborator behaves like the platform preference store it
/// stands in for. Also serves as the isolated in-memory backend for tests.
#[derive(Clone)]
pub struct PrefsBackend {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    key: String,
}

impl Default for PrefsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            key: CARDS_KEY.to_owned(),
        }
    }

    /// Uses a different preference key, e.g. to isolate decks in tests.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[async_trait]
impl DeckBackend for PrefsBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(guard.get(&self.key).cloned())
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        guard.insert(self.key.clone(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_loads_none() {
        let backend = PrefsBackend::new();
        assert!(backend.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_the_same_entries() {
        let backend = PrefsBackend::new();
        let other = backend.clone();

        backend.save(b"[]").await.unwrap();
        assert_eq!(other.load().await.unwrap().unwrap(), b"[]");
    }

    #[tokio::test]
    async fn distinct_keys_are_isolated() {
        let backend = PrefsBackend::new();
        let scoped = backend.clone().with_key("Other");

        backend.save(b"deck").await.unwrap();
        assert!(scoped.load().await.unwrap().is_none());
    }
}
