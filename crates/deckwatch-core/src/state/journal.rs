// # File Observation Log
//
// File-based implementation of ObservationLog: a single JSON array that is
// rewritten in full on every append. Append frequency is bounded by the
// polling interval times the number of items.
//
// Recovery follows the status store: a missing file is created as `[]`, a
// corrupt one degrades to an empty sequence in memory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::json_file;
use crate::Error;
use crate::traits::observation_log::{ObservationLog, ObservationLogEntry};

/// File-based append-only observation log
#[derive(Debug)]
pub struct FileObservationLog {
    path: PathBuf,
    state: Arc<RwLock<JournalState>>,
}

#[derive(Debug)]
struct JournalState {
    entries: Vec<ObservationLogEntry>,
    dirty: bool,
}

impl FileObservationLog {
    /// Open (or create) a log file
    pub async fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<ObservationLogEntry> = json_file::load_or_init(&path, "observation log").await;

        tracing::debug!("Loaded observation log: {} entries", entries.len());

        Self {
            path,
            state: Arc::new(RwLock::new(JournalState {
                entries,
                dirty: false,
            })),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of recorded observations
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether nothing has been recorded yet
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl ObservationLog for FileObservationLog {
    async fn append(&self, entry: ObservationLogEntry) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;
        state_guard.entries.push(entry);
        state_guard.dirty = true;

        json_file::write_atomic(&self.path, &state_guard.entries).await?;
        state_guard.dirty = false;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<ObservationLogEntry>, Error> {
        Ok(self.state.read().await.entries.clone())
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
