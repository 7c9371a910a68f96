//! Behavioral Contract Test: Persistence Across Restarts
//!
//! This test verifies that the file stores carry state between runs.
//!
//! Constraints verified:
//! - A restart with unchanged availability sends no alerts
//! - A change that happened while stopped is announced after restart
//! - Every observation lands in the observation log, in order
//!
//! If this test fails, someone has broken:
//! - Write-through persistence of the status file
//! - Loading of existing state on open

mod common;

use common::*;
use deckwatch_core::{FileObservationLog, FileStatusStore, ObservationLog, StatusStore};
use std::sync::Arc;

async fn run_once_with_files(
    dir: &std::path::Path,
    provider: &ScriptedProvider,
    notifier: &RecordingNotifier,
) {
    let store = FileStatusStore::open(dir.join("status.json")).await;
    let log = FileObservationLog::open(dir.join("log.json")).await;

    let (engine, _events) = build_engine(
        provider,
        notifier,
        Arc::new(store),
        Some(Arc::new(log)),
        no_delay_config(),
    );

    engine.run_cycle().await;
}

#[tokio::test]
async fn restart_with_unchanged_state_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::new();

    let provider = ScriptedProvider::new().script("903906", [Outcome::Available(true)]);
    run_once_with_files(dir.path(), &provider, &notifier).await;
    run_once_with_files(dir.path(), &provider, &notifier).await;

    assert!(notifier.alerts().is_empty());

    let store = FileStatusStore::open(dir.path().join("status.json")).await;
    assert_eq!(store.len().await, 5);
    assert_eq!(
        store.get("903906_DE").await.unwrap().as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn change_while_stopped_is_announced_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::new();

    let before = ScriptedProvider::new();
    run_once_with_files(dir.path(), &before, &notifier).await;
    assert!(notifier.alerts().is_empty());

    let after = ScriptedProvider::new().script("1202542", [Outcome::Available(true)]);
    run_once_with_files(dir.path(), &after, &notifier).await;

    let alerts = notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].text.contains("512GB OLED"));
}

#[tokio::test]
async fn observation_log_accumulates_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::new();
    let provider = ScriptedProvider::new();

    run_once_with_files(dir.path(), &provider, &notifier).await;
    run_once_with_files(dir.path(), &provider, &notifier).await;

    let log = FileObservationLog::open(dir.path().join("log.json")).await;
    let entries = log.entries().await.unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].package_id, "903905");
    assert_eq!(entries[9].package_id, "1202547");
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let raw = std::fs::read_to_string(dir.path().join("log.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["storage_gb"], "64");
    assert_eq!(first["display_type"], "LCD");
    assert_eq!(first["country_code"], "DE");
    assert!(first["unix_timestamp"].is_i64());
}
