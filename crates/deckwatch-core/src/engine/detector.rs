//! Transition detection
//!
//! Compares a fresh observation with the status store and decides whether a
//! user-visible transition happened.
//!
//! ## Rules
//!
//! 1. A failed fetch never touches the status store and never notifies
//! 2. A successful fetch always rewrites the stored value, even when unchanged
//! 3. A transition needs a non-empty previous value that differs from the new one
//!
//! Rule 3 means the first observation of any item only establishes a baseline.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::WatchedItem;
use crate::error::Error;
use crate::message::{NotificationIntent, TIME_FORMAT};
use crate::traits::{ObservationLog, ObservationLogEntry, StatusStore};

/// Stateless comparator over the injected stores
#[derive(Clone)]
pub struct TransitionDetector {
    status_store: Arc<dyn StatusStore>,
    observation_log: Option<Arc<dyn ObservationLog>>,
}

impl TransitionDetector {
    /// Create a detector
    ///
    /// `observation_log` is `None` when observation logging is disabled.
    pub fn new(
        status_store: Arc<dyn StatusStore>,
        observation_log: Option<Arc<dyn ObservationLog>>,
    ) -> Self {
        Self {
            status_store,
            observation_log,
        }
    }

    /// Process one observation (or failed observation) of `item`
    ///
    /// Persistence errors are logged here and never returned: a broken disk
    /// must not stop the remaining items of the cycle.
    pub async fn process(
        &self,
        item: &WatchedItem,
        region_code: &str,
        outcome: &Result<bool, Error>,
        observed_at: DateTime<Utc>,
    ) -> Option<NotificationIntent> {
        let key = item.status_key(region_code);

        let previous = match self.status_store.get(&key).await {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read status for {}: {}", key, e);
                String::new()
            }
        };

        let available = match outcome {
            Ok(available) => *available,
            Err(e) => {
                error!("Error fetching data for {}: {}", item.model_name(), e);
                self.record(item, region_code, false, observed_at).await;
                return None;
            }
        };

        let current = available.to_string();

        info!(
            "{} >> {} Result: {} (was: {})",
            observed_at.format(TIME_FORMAT),
            item.model_name(),
            current,
            previous
        );

        if let Err(e) = self.status_store.set(&key, &current).await {
            error!("Failed to save status for {}: {}", key, e);
        }

        self.record(item, region_code, available, observed_at).await;

        if previous.is_empty() || previous == current {
            return None;
        }

        Some(NotificationIntent {
            item: item.clone(),
            region_code: region_code.to_string(),
            available,
            previous,
            observed_at,
        })
    }

    /// Flush both stores
    pub async fn flush(&self) -> Result<(), Error> {
        self.status_store.flush().await?;
        if let Some(log) = &self.observation_log {
            log.flush().await?;
        }
        Ok(())
    }

    async fn record(
        &self,
        item: &WatchedItem,
        region_code: &str,
        available: bool,
        observed_at: DateTime<Utc>,
    ) {
        let Some(log) = &self.observation_log else {
            return;
        };

        let entry = ObservationLogEntry::new(item, region_code, available, observed_at);
        if let Err(e) = log.append(entry).await {
            error!("Failed to append observation for {}: {}", item.model_name(), e);
        }
    }
}
