// # Observation Log Trait
//
// Defines the interface for the optional append-only history of every
// availability check, kept for later analysis.
//
// ## File Format
//
// ```json
// [
//   {
//     "unix_timestamp": 1735725600,
//     "storage_gb": "512",
//     "display_type": "OLED",
//     "package_id": "1202542",
//     "available": false,
//     "country_code": "DE"
//   }
// ]
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{DisplayType, WatchedItem};

/// One availability observation
///
/// Failed fetches are recorded with `available = false`, so an entry does not
/// distinguish "observed out of stock" from "could not observe".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLogEntry {
    /// Observation time in seconds since the Unix epoch
    #[serde(rename = "unix_timestamp")]
    pub timestamp: i64,

    /// Storage size label
    #[serde(rename = "storage_gb")]
    pub size_label: String,

    /// Panel type
    #[serde(rename = "display_type")]
    pub display: DisplayType,

    /// Provider package id
    pub package_id: String,

    /// Observed availability
    pub available: bool,

    /// Region the check ran against
    #[serde(rename = "country_code")]
    pub region_code: String,
}

impl ObservationLogEntry {
    /// Build an entry for `item` observed at `observed_at`
    pub fn new(
        item: &WatchedItem,
        region_code: &str,
        available: bool,
        observed_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            timestamp: observed_at.timestamp(),
            size_label: item.size_label.clone(),
            display: item.display,
            package_id: item.package_id.clone(),
            available,
            region_code: region_code.to_string(),
        }
    }
}

/// Trait for observation log implementations
#[async_trait]
pub trait ObservationLog: Send + Sync {
    /// Append one entry and persist the log
    async fn append(&self, entry: ObservationLogEntry) -> Result<(), crate::Error>;

    /// All entries in insertion order
    async fn entries(&self) -> Result<Vec<ObservationLogEntry>, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entry_serializes_with_log_field_names() {
        let item = WatchedItem::new("1024", "1202547", DisplayType::Oled);
        let at = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let entry = ObservationLogEntry::new(&item, "DE", true, at);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["unix_timestamp"], 1735725600);
        assert_eq!(json["storage_gb"], "1024");
        assert_eq!(json["display_type"], "OLED");
        assert_eq!(json["package_id"], "1202547");
        assert_eq!(json["available"], true);
        assert_eq!(json["country_code"], "DE");
    }
}
