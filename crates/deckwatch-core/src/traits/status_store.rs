// # Status Store Trait
//
// Defines the interface for the durable last-known availability of each
// watched item.
//
// ## Purpose
//
// The status store is what makes notifications transition-based:
// - Keys are `<package_id>_<region>` (see [`crate::config::status_key`])
// - Values are `"true"` or `"false"`
// - An absent key means the item has never been observed
//
// It survives restarts so that a restart does not re-announce the current state.
//
// ## Implementations
//
// - File-based: [`crate::state::FileStatusStore`] (single JSON object)
// - In-memory: [`crate::state::MemoryStatusStore`]

use async_trait::async_trait;

/// Trait for status store implementations
///
/// # Durability
///
/// `set` is write-through: when it returns `Ok`, the new mapping is on disk
/// (for persistent implementations). When it returns `Err`, the in-memory
/// view has still been updated and the caller decides how to report it.
///
/// # Concurrency
///
/// Implementations assume a single writer. They are `Send + Sync` so they can
/// be shared behind an `Arc`, not so they can be written concurrently.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Get the stored value for a key
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: The last stored value
    /// - `Ok(None)`: The key was never written
    /// - `Err(Error)`: Storage error
    async fn get(&self, key: &str) -> Result<Option<String>, crate::Error>;

    /// Store a value for a key, persisting the whole mapping
    async fn set(&self, key: &str, value: &str) -> Result<(), crate::Error>;

    /// List all keys in the store
    async fn list_keys(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}
