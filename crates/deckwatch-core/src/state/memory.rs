// # Memory Stores
//
// In-memory implementations of StatusStore and ObservationLog.
//
// ## Purpose
//
// Fast stores that don't persist across restarts. Useful for testing and for
// embedding the engine where persistence is handled elsewhere.
//
// ## Crash Behavior
//
// - All state is lost on restart/crash
// - First cycle after a restart re-establishes every baseline silently

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::observation_log::{ObservationLog, ObservationLogEntry};
use crate::traits::status_store::StatusStore;

/// In-memory status store implementation
///
/// # Example
///
/// ```rust
/// use deckwatch_core::state::MemoryStatusStore;
/// use deckwatch_core::traits::StatusStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStatusStore::with_entries([("903907_DE", "false")]);
///     assert_eq!(store.get("903907_DE").await?.as_deref(), Some("false"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStatusStore {
    /// Create a new empty memory status store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Get the number of keys in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Copy of the full mapping
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // No-op for memory store
        Ok(())
    }
}

/// In-memory observation log implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryObservationLog {
    inner: Arc<RwLock<Vec<ObservationLogEntry>>>,
}

impl MemoryObservationLog {
    /// Create a new empty memory log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded observations
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether nothing has been recorded yet
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ObservationLog for MemoryObservationLog {
    async fn append(&self, entry: ObservationLogEntry) -> Result<(), Error> {
        self.inner.write().await.push(entry);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<ObservationLogEntry>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
