// # File Status Store
//
// File-based implementation of StatusStore.
//
// ## Purpose
//
// Keeps the last observed availability of every item across restarts, so a
// restart never re-announces the current state as a transition.
//
// ## Recovery
//
// - Missing file: initialised to `{}` on open
// - Corrupt or unreadable file: empty mapping in memory (previous state is
//   lost, not fatal); the file is replaced on the next write
//
// ## File Format
//
// ```json
// {
//   "903905_DE": "false",
//   "1202542_DE": "true"
// }
// ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::json_file;
use crate::Error;
use crate::traits::status_store::StatusStore;

/// File-based status store with write-through persistence
///
/// Every `set` rewrites the whole file via a temporary file and a rename.
/// There is no locking across processes: one monitor per file.
///
/// # Example
///
/// ```rust,no_run
/// use deckwatch_core::state::FileStatusStore;
/// use deckwatch_core::traits::StatusStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStatusStore::open("/app/data/status.json").await;
///
///     store.set("903907_DE", "true").await?;
///     assert_eq!(store.get("903907_DE").await?.as_deref(), Some("true"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStatusStore {
    path: PathBuf,
    state: Arc<RwLock<StatusState>>,
}

#[derive(Debug)]
struct StatusState {
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl FileStatusStore {
    /// Open (or create) a status file
    ///
    /// Never fails: storage problems are logged and the store continues with
    /// an in-memory mapping.
    pub async fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = json_file::load_or_init(&path, "status").await;

        tracing::debug!("Loaded status file: {} entries", entries.len());

        Self {
            path,
            state: Arc::new(RwLock::new(StatusState {
                entries,
                dirty: false,
            })),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether no key has been stored yet
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl StatusStore for FileStatusStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;
        state_guard
            .entries
            .insert(key.to_string(), value.to_string());
        state_guard.dirty = true;

        // Immediate write for durability
        json_file::write_atomic(&self.path, &state_guard.entries).await?;
        state_guard.dirty = false;
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.entries.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;
        if !state_guard.dirty {
            return Ok(());
        }

        json_file::write_atomic(&self.path, &state_guard.entries).await?;
        state_guard.dirty = false;
        Ok(())
    }
}
