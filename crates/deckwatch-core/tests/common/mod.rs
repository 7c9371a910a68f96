//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that verify behavioral
//! constraints without talking to any real service.

#![allow(dead_code)]

use async_trait::async_trait;
use deckwatch_core::config::{EngineConfig, MonitorConfig};
use deckwatch_core::error::{NetworkError, Result};
use deckwatch_core::message::Message;
use deckwatch_core::traits::{AvailabilityProvider, Notifier, StatusStore};
use deckwatch_core::{Error, WatchedItem};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Scripted outcome for one fetch
#[derive(Debug, Clone)]
pub enum Outcome {
    Available(bool),
    Fail(NetworkError),
}

impl Outcome {
    fn to_result(&self) -> Result<bool> {
        match self {
            Outcome::Available(value) => Ok(*value),
            Outcome::Fail(e) => Err(Error::from(e.clone())),
        }
    }
}

/// An AvailabilityProvider that replays a script per package id
///
/// Each call pops the next outcome for the package; the last outcome repeats
/// once the script runs out. Packages without a script report `false`.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Outcome>>>>,
    calls: Arc<Mutex<Vec<(String, String, Instant)>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for a package
    pub fn script(self, package_id: &str, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(package_id.to_string())
            .or_default()
            .extend(outcomes);
        self
    }

    /// Total number of fetch() calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Package ids in call order
    pub fn called_packages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(package, _, _)| package.clone())
            .collect()
    }

    /// Regions in call order
    pub fn called_regions(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, region, _)| region.clone())
            .collect()
    }

    /// Instants at which fetch() was entered
    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, at)| *at)
            .collect()
    }
}

#[async_trait]
impl AvailabilityProvider for ScriptedProvider {
    async fn fetch(&self, item: &WatchedItem, region_code: &str) -> Result<bool> {
        self.calls.lock().unwrap().push((
            item.package_id.clone(),
            region_code.to_string(),
            Instant::now(),
        ));

        let mut scripts = self.scripts.lock().unwrap();
        let Some(queue) = scripts.get_mut(&item.package_id) else {
            return Ok(false);
        };

        let outcome = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        outcome.map_or(Ok(false), |o| o.to_result())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// A Notifier that records every message it is asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Message>>>,
    attempts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send() fail from now on
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Messages that were delivered successfully
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of send() calls, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Delivered messages other than the startup announcement
    pub fn alerts(&self) -> Vec<Message> {
        self.sent()
            .into_iter()
            .filter(|m| !m.text.contains("Notifier started"))
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::notifier("Bad Request: chat not found"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "recording"
    }
}

/// A StatusStore whose writes always fail
#[derive(Clone, Default)]
pub struct FailingStatusStore {
    set_attempts: Arc<AtomicUsize>,
}

impl FailingStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attempts(&self) -> usize {
        self.set_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for FailingStatusStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.set_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::persistence("disk full"))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn flush(&self) -> Result<()> {
        Err(Error::persistence("disk full"))
    }
}

/// Default line-up in DE with the default timings
pub fn minimal_config() -> MonitorConfig {
    MonitorConfig::new("DE")
}

/// Config with a single item and a custom interval
pub fn single_item_config(item: WatchedItem, poll_interval_secs: u64) -> MonitorConfig {
    MonitorConfig::new("DE")
        .with_items(vec![item])
        .with_engine(EngineConfig {
            poll_interval_secs,
            ..EngineConfig::default()
        })
}

/// Build an engine over the given doubles
pub fn build_engine(
    provider: &ScriptedProvider,
    notifier: &RecordingNotifier,
    status_store: Arc<dyn StatusStore>,
    observation_log: Option<Arc<dyn deckwatch_core::ObservationLog>>,
    config: MonitorConfig,
) -> (
    deckwatch_core::MonitorEngine,
    tokio::sync::mpsc::Receiver<deckwatch_core::EngineEvent>,
) {
    deckwatch_core::MonitorEngine::new(
        Box::new(provider.clone()),
        Box::new(notifier.clone()),
        status_store,
        observation_log,
        config,
    )
    .expect("engine construction succeeds")
}

/// Drain every event currently buffered in the channel
pub fn drain_events(
    rx: &mut tokio::sync::mpsc::Receiver<deckwatch_core::EngineEvent>,
) -> Vec<deckwatch_core::EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Default line-up without inter-item delay, for tests that drive run_cycle()
pub fn no_delay_config() -> MonitorConfig {
    MonitorConfig::new("DE").with_engine(EngineConfig {
        item_delay_millis: 0,
        ..EngineConfig::default()
    })
}
