//! Configuration types for deckwatch
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Region (country) code passed to the availability provider, e.g. "DE"
    pub region_code: String,

    /// Items to watch, processed in this order every cycle
    #[serde(default = "default_items")]
    pub items: Vec<WatchedItem>,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl MonitorConfig {
    /// Create a configuration for the default line-up in the given region
    pub fn new(region_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            items: default_items(),
            engine: EngineConfig::default(),
        }
    }

    /// Replace the watched items
    pub fn with_items(mut self, items: Vec<WatchedItem>) -> Self {
        self.items = items;
        self
    }

    /// Replace the engine settings
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.region_code.trim().is_empty() {
            return Err(crate::Error::config("Region code cannot be empty"));
        }

        if self.items.is_empty() {
            return Err(crate::Error::config("No items configured"));
        }

        for item in &self.items {
            item.validate()?;
        }

        self.engine.validate()?;

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(default_region_code())
    }
}

/// Panel type of a watched model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayType {
    /// Original LCD models
    Lcd,
    /// OLED refresh models
    Oled,
}

impl DisplayType {
    /// Label used in logs and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Lcd => "LCD",
            DisplayType::Oled => "OLED",
        }
    }
}

impl std::fmt::Display for DisplayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single watched product variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedItem {
    /// Storage size label in GB (e.g., "512")
    pub size_label: String,

    /// Provider-specific package identifier (e.g., "903907")
    pub package_id: String,

    /// Panel type
    pub display: DisplayType,
}

impl WatchedItem {
    /// Create a new watched item
    pub fn new(
        size_label: impl Into<String>,
        package_id: impl Into<String>,
        display: DisplayType,
    ) -> Self {
        Self {
            size_label: size_label.into(),
            package_id: package_id.into(),
            display,
        }
    }

    /// Human-readable model name, e.g. "512GB OLED"
    pub fn model_name(&self) -> String {
        format!("{}GB {}", self.size_label, self.display)
    }

    /// Status store key for this item in a region
    pub fn status_key(&self, region_code: &str) -> String {
        status_key(&self.package_id, region_code)
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if self.package_id.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "Item {} has an empty package id",
                self.model_name()
            )));
        }
        Ok(())
    }
}

/// Composite status key: `<package_id>_<region_code>`
pub fn status_key(package_id: &str, region_code: &str) -> String {
    format!("{}_{}", package_id, region_code)
}

/// The refurbished Steam Deck line-up, in check order
pub fn default_items() -> Vec<WatchedItem> {
    vec![
        WatchedItem::new("64", "903905", DisplayType::Lcd),
        WatchedItem::new("256", "903906", DisplayType::Lcd),
        WatchedItem::new("512", "903907", DisplayType::Lcd),
        WatchedItem::new("512", "1202542", DisplayType::Oled),
        WatchedItem::new("1024", "1202547", DisplayType::Oled),
    ]
}

fn default_region_code() -> String {
    "DE".to_string()
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sleep between the end of one cycle and the start of the next (in seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Delay between consecutive items within a cycle (in milliseconds)
    #[serde(default = "default_item_delay_millis")]
    pub item_delay_millis: u64,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Polling interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Inter-item delay as a duration
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_millis)
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            item_delay_millis: default_item_delay_millis(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    180
}

fn default_item_delay_millis() -> u64 {
    1000
}

fn default_event_channel_capacity() -> usize {
    100
}

/// Where the durable stores live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the status file
    #[serde(default = "default_status_path")]
    pub status_path: String,

    /// Path to the observation log file
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Whether every observation is appended to the log
    #[serde(default)]
    pub observation_log_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            status_path: default_status_path(),
            log_path: default_log_path(),
            observation_log_enabled: false,
        }
    }
}

fn default_status_path() -> String {
    "/app/data/status.json".to_string()
}

fn default_log_path() -> String {
    "/app/data/log.json".to_string()
}

/// Notification channel credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Bot token
    /// ⚠️ NEVER log this value
    pub bot_token: String,

    /// Target chat
    pub chat_id: String,
}

impl NotifierConfig {
    /// Create a new notifier configuration
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Validate that both credentials are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.bot_token.trim().is_empty() || self.chat_id.trim().is_empty() {
            return Err(crate::Error::config(
                "Notifier bot token and chat id are required",
            ));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the bot token
impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("bot_token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lineup_order_is_stable() {
        let ids: Vec<_> = default_items()
            .into_iter()
            .map(|item| item.package_id)
            .collect();
        assert_eq!(ids, ["903905", "903906", "903907", "1202542", "1202547"]);
    }

    #[test]
    fn status_key_joins_package_and_region() {
        let item = WatchedItem::new("512", "903907", DisplayType::Lcd);
        assert_eq!(item.status_key("DE"), "903907_DE");
        assert_eq!(item.model_name(), "512GB LCD");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = MonitorConfig::default();
        assert_eq!(config.region_code, "DE");
        assert_eq!(config.engine.poll_interval(), Duration::from_secs(180));
        assert_eq!(config.engine.item_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());

        let storage = StorageConfig::default();
        assert_eq!(storage.status_path, "/app/data/status.json");
        assert!(!storage.observation_log_enabled);
    }

    #[test]
    fn validation_rejects_bad_configs() {
        assert!(MonitorConfig::new("").validate().is_err());
        assert!(MonitorConfig::new("DE").with_items(vec![]).validate().is_err());

        let engine = EngineConfig {
            poll_interval_secs: 0,
            ..EngineConfig::default()
        };
        assert!(MonitorConfig::new("DE").with_engine(engine).validate().is_err());

        let blank = WatchedItem::new("64", " ", DisplayType::Lcd);
        assert!(MonitorConfig::new("DE").with_items(vec![blank]).validate().is_err());
    }

    #[test]
    fn engine_config_fills_defaults_from_partial_json() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"region_code":"US","engine":{"poll_interval_secs":60}}"#)
                .unwrap();
        assert_eq!(config.items.len(), 5);
        assert_eq!(config.engine.poll_interval_secs, 60);
        assert_eq!(config.engine.item_delay_millis, 1000);
    }

    #[test]
    fn notifier_config_requires_credentials_and_hides_token() {
        assert!(NotifierConfig::new("", "42").validate().is_err());
        assert!(NotifierConfig::new("123:abc", "").validate().is_err());

        let config = NotifierConfig::new("123:secret", "42");
        assert!(config.validate().is_ok());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("42"));
    }
}
