// # Notifier Trait
//
// Defines the interface for delivering a formatted message to one external
// channel.
//
// ## Implementations
//
// - Telegram Bot API: `deckwatch-notifier-telegram` crate

use async_trait::async_trait;

use crate::message::Message;

/// Trait for notification channel implementations
///
/// Implementations return an error on transport failure or a negative
/// acknowledgement. They must not retry. The engine handles every error by
/// logging it; a failed delivery never aborts a polling cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message to the configured channel
    async fn send(&self, message: &Message) -> Result<(), crate::Error>;

    /// Get the channel name (for logging/debugging)
    fn channel_name(&self) -> &'static str;
}
