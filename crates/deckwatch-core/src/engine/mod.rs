//! Polling engine
//!
//! The MonitorEngine is responsible for:
//! - Iterating over the watched items in a fixed order, one at a time
//! - Fetching availability via AvailabilityProvider
//! - Running each observation through the TransitionDetector
//! - Delivering notifications for transitions via Notifier
//! - Sleeping between items and between cycles
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ AvailabilityProvider │─── Result<bool> ───┐
//! └──────────────────────┘                    │
//!                                             ▼
//!                                   ┌──────────────────┐
//!                                   │  MonitorEngine   │
//!                                   └──────────────────┘
//!                                             │
//!         ┌───────────────────────────────────┼──────────────────────────┐
//!         │                                   │                          │
//!         ▼                                   ▼                          ▼
//! ┌────────────────────┐           ┌──────────────┐           ┌─────────────┐
//! │ TransitionDetector │           │   Notifier   │           │   Events    │
//! │ (store + log)      │           │   (send)     │           │  (observe)  │
//! └────────────────────┘           └──────────────┘           └─────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! `STARTING` (startup announcement) → `RUNNING` (cycles forever) →
//! `SHUTTING_DOWN` (on signal). The shutdown signal is observed while the
//! engine waits between items and between cycles; an item that is already
//! being processed always completes first.

mod detector;

pub use detector::TransitionDetector;

use chrono::Utc;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::{MonitorConfig, WatchedItem};
use crate::error::Result;
use crate::message::Message;
use crate::traits::{AvailabilityProvider, Notifier, ObservationLog, StatusStore};

/// Future that resolves when the engine should stop
type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Events emitted by the MonitorEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        items_count: usize,
        region_code: String,
    },

    /// A new cycle began
    CycleStarted {
        cycle: u64,
    },

    /// Availability fetched for an item
    ItemChecked {
        package_id: String,
        available: bool,
    },

    /// Availability fetch failed for an item
    ItemFailed {
        package_id: String,
        error: String,
    },

    /// Availability changed for an item
    TransitionDetected {
        package_id: String,
        region_code: String,
        available: bool,
    },

    /// A notification could not be delivered
    NotificationFailed {
        error: String,
    },

    /// A cycle finished
    CycleCompleted {
        cycle: u64,
        summary: CycleSummary,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Outcome counts for one pass over the items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Items whose fetch was attempted
    pub checked: usize,
    /// Items whose fetch failed
    pub failed: usize,
    /// Transitions detected (one notification attempt each)
    pub transitions: usize,
    /// Wall time of the cycle, including inter-item delays
    pub duration: Duration,
}

/// Availability polling engine
///
/// The engine orchestrates the fetch → detect → notify pipeline for every
/// watched item. It runs on a single task and never processes two items at
/// the same time.
///
/// ## Lifecycle
///
/// 1. Create with [`MonitorEngine::new()`]
/// 2. Start with [`MonitorEngine::run()`]
/// 3. Engine runs until a shutdown signal is received
pub struct MonitorEngine {
    /// Availability source
    provider: Box<dyn AvailabilityProvider>,

    /// Notification channel
    notifier: Box<dyn Notifier>,

    /// Transition detection over the injected stores
    detector: TransitionDetector,

    /// Items to check, in order
    items: Vec<WatchedItem>,

    /// Region passed to the provider
    region_code: String,

    /// Sleep after each cycle
    poll_interval: Duration,

    /// Delay between consecutive items
    item_delay: Duration,

    /// Number of cycles started
    cycles: AtomicU64,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl MonitorEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `provider`: Availability provider implementation
    /// - `notifier`: Notification channel implementation
    /// - `status_store`: Last-known availability per item
    /// - `observation_log`: Observation history, `None` when logging is disabled
    /// - `config`: Monitor configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        provider: Box<dyn AvailabilityProvider>,
        notifier: Box<dyn Notifier>,
        status_store: Arc<dyn StatusStore>,
        observation_log: Option<Arc<dyn ObservationLog>>,
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            provider,
            notifier,
            detector: TransitionDetector::new(status_store, observation_log),
            poll_interval: config.engine.poll_interval(),
            item_delay: config.engine.item_delay(),
            items: config.items,
            region_code: config.region_code,
            cycles: AtomicU64::new(0),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Items checked every cycle, in order
    pub fn items(&self) -> &[WatchedItem] {
        &self.items
    }

    /// Region passed to the provider
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// Run the engine until SIGINT (Ctrl-C)
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    pub async fn run(&self) -> Result<()> {
        self.run_with_shutdown(None).await
    }

    /// Run the engine until `shutdown_rx` fires (or is dropped)
    ///
    /// With `None`, the engine waits for Ctrl-C like [`MonitorEngine::run()`].
    /// Embedders that handle signals themselves pass a receiver here.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        let shutdown: ShutdownSignal = match shutdown_rx {
            Some(rx) => Box::pin(async move {
                let _ = rx.await;
            }),
            None => Box::pin(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }),
        };

        self.run_internal(shutdown).await
    }

    /// Run exactly one pass over all items
    ///
    /// Does not send the startup announcement and does not sleep afterwards.
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut never: ShutdownSignal = Box::pin(std::future::pending());
        self.cycle(&mut never).await.unwrap_or_default()
    }

    async fn run_internal(&self, mut shutdown: ShutdownSignal) -> Result<()> {
        self.start().await;

        loop {
            if self.cycle(&mut shutdown).await.is_none() {
                break;
            }

            info!("Sleeping for {} seconds...", self.poll_interval.as_secs());
            if self.pause(self.poll_interval, &mut shutdown).await {
                break;
            }
        }

        info!("Shutdown signal received");

        // Both stores write through, so this only matters after a failed write
        if let Err(e) = self.detector.flush().await {
            error!("Failed to flush state on shutdown: {}", e);
        }

        self.emit_event(EngineEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });
        info!("Engine stopped");

        Ok(())
    }

    /// STARTING: announce the monitor and the watched line-up
    async fn start(&self) {
        self.emit_event(EngineEvent::Started {
            items_count: self.items.len(),
            region_code: self.region_code.clone(),
        });

        info!(
            "Starting availability checks for region {} via {}",
            self.region_code,
            self.provider.provider_name()
        );
        info!("Monitoring {} models:", self.items.len());
        for item in &self.items {
            info!("   - {} ({})", item.model_name(), item.package_id);
        }

        self.deliver(&Message::startup(&self.region_code)).await;
    }

    /// One pass over all items; `None` if shutdown interrupted it
    async fn cycle(&self, shutdown: &mut ShutdownSignal) -> Option<CycleSummary> {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();

        info!("Starting check cycle {} at {}", cycle, Utc::now().to_rfc3339());
        self.emit_event(EngineEvent::CycleStarted { cycle });

        let mut summary = CycleSummary::default();

        for (index, item) in self.items.iter().enumerate() {
            if index > 0 && self.pause(self.item_delay, shutdown).await {
                debug!("Cycle {} interrupted after {} items", cycle, index);
                return None;
            }

            self.check_item(item, &mut summary).await;
        }

        summary.duration = started.elapsed();
        info!(
            "Check cycle {} completed in {}ms ({} checked, {} failed, {} transitions)",
            cycle,
            summary.duration.as_millis(),
            summary.checked,
            summary.failed,
            summary.transitions
        );
        self.emit_event(EngineEvent::CycleCompleted {
            cycle,
            summary: summary.clone(),
        });

        Some(summary)
    }

    /// Full pipeline for a single item; never fails outward
    async fn check_item(&self, item: &WatchedItem, summary: &mut CycleSummary) {
        let outcome = self.provider.fetch(item, &self.region_code).await;
        let observed_at = Utc::now();
        summary.checked += 1;

        match &outcome {
            Ok(available) => self.emit_event(EngineEvent::ItemChecked {
                package_id: item.package_id.clone(),
                available: *available,
            }),
            Err(e) => {
                summary.failed += 1;
                self.emit_event(EngineEvent::ItemFailed {
                    package_id: item.package_id.clone(),
                    error: e.to_string(),
                });
            }
        }

        let Some(intent) = self
            .detector
            .process(item, &self.region_code, &outcome, observed_at)
            .await
        else {
            return;
        };

        summary.transitions += 1;
        info!(
            "Availability of {} in {} changed: {} -> {}",
            item.model_name(),
            intent.region_code,
            intent.previous,
            intent.available
        );
        self.emit_event(EngineEvent::TransitionDetected {
            package_id: item.package_id.clone(),
            region_code: intent.region_code.clone(),
            available: intent.available,
        });

        self.deliver(&intent.to_message()).await;
    }

    /// Send a message; failures are logged and reported as an event
    async fn deliver(&self, message: &Message) {
        match self.notifier.send(message).await {
            Ok(()) => {
                debug!("Notification delivered via {}", self.notifier.channel_name());
            }
            Err(e) => {
                error!(
                    "Notification via {} failed: {}",
                    self.notifier.channel_name(),
                    e
                );
                self.emit_event(EngineEvent::NotificationFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Sleep for `duration`; returns `true` if shutdown fired first
    async fn pause(&self, duration: Duration, shutdown: &mut ShutdownSignal) -> bool {
        tokio::select! {
            biased;
            _ = shutdown.as_mut() => true,
            _ = tokio::time::sleep(duration) => false,
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}
