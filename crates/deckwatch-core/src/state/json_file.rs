// Shared load/persist helpers for the single-document JSON stores.
//
// Both durable stores keep one JSON document per file and rewrite it in full
// on every mutation. Loading never fails: a missing file is initialised with
// the empty document and an unreadable or corrupt file degrades to the empty
// document in memory.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;

/// Load a JSON document, recovering to `T::default()` when missing or corrupt
pub(crate) async fn load_or_init<T>(path: &Path, what: &str) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent).await
    {
        tracing::error!(
            "Failed to create {} directory {}: {}",
            what,
            parent.display(),
            e
        );
    }

    if !path.exists() {
        let empty = T::default();
        match write_atomic(path, &empty).await {
            Ok(()) => tracing::debug!("Initialised {} file: {}", what, path.display()),
            Err(e) => tracing::error!(
                "Failed to create {} file ({}): {}",
                what,
                path.display(),
                e
            ),
        }
        return empty;
    }

    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                "Failed to read {} file ({}): {}. Starting with empty state.",
                what,
                path.display(),
                e
            );
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(
                "{} file appears corrupted ({}): {}. Starting with empty state.",
                what,
                path.display(),
                e
            );
            T::default()
        }
    }
}

/// Rewrite the whole document: temp file first, then rename over the target
pub(crate) async fn write_atomic<T: Serialize>(path: &Path, document: &T) -> Result<(), Error> {
    let json = serde_json::to_string(document)
        .map_err(|e| Error::persistence(format!("Failed to serialize {}: {}", path.display(), e)))?;

    let temp_path = temp_path(path);
    {
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(json.as_bytes()).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.flush().await.map_err(|e| {
            Error::persistence(format!(
                "Failed to flush temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
    }

    fs::rename(&temp_path, path).await.map_err(|e| {
        Error::persistence(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        ))
    })?;

    tracing::trace!("Wrote {}", path.display());
    Ok(())
}

/// `status.json` -> `status.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
