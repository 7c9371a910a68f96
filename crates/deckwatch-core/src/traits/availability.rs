// # Availability Provider Trait
//
// Defines the interface for asking a remote inventory source whether one
// item is currently available.
//
// ## Implementations
//
// - Steam inventory API: `deckwatch-source-steam` crate
//
// ## Usage
//
// ```rust,ignore
// use deckwatch_core::{AvailabilityProvider, WatchedItem, DisplayType};
//
// let item = WatchedItem::new("512", "903907", DisplayType::Lcd);
// let available = provider.fetch(&item, "DE").await?;
// ```

use async_trait::async_trait;

use crate::config::WatchedItem;

/// Trait for availability provider implementations
///
/// # Contract
///
/// - **Single-shot**: exactly one outbound request per call
/// - **Bounded**: the call must fail with `NetworkError::Timeout` instead of
///   hanging past the provider timeout
/// - **No retries**: the next polling cycle is the retry
/// - **Stateless**: no access to the status store or observation log
///
/// Non-success statuses map to `NetworkError::HttpStatus`, and a body without a
/// usable availability field maps to `NetworkError::MalformedResponse`.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Fetch the current availability of `item` in `region_code`
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The item can be bought right now
    /// - `Ok(false)`: The item is out of stock
    /// - `Err(Error::Network(_))`: The observation could not be made
    async fn fetch(&self, item: &WatchedItem, region_code: &str) -> Result<bool, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
