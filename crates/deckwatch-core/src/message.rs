//! Notification intents and message formatting
//!
//! The transition detector produces a [`NotificationIntent`]; this module
//! turns it (and the one-time startup announcement) into a [`Message`] that a
//! [`crate::Notifier`] can deliver as-is.

use chrono::{DateTime, Utc};

use crate::config::WatchedItem;

/// Store page linked from availability alerts
pub const STORE_URL: &str = "https://store.steampowered.com/steamdeck";

/// Timestamp layout used in logs and messages
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How the channel should interpret the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Telegram-flavoured HTML (`<b>`, `<a href>`)
    Html,
    /// Plain text
    Plain,
}

/// A formatted message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message body
    pub text: String,
    /// Body format
    pub format: MessageFormat,
}

impl Message {
    /// Create an HTML message
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: MessageFormat::Html,
        }
    }

    /// Create a plain-text message
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: MessageFormat::Plain,
        }
    }

    /// One-time announcement sent when monitoring starts
    pub fn startup(region_code: &str) -> Self {
        Self::html(format!(
            "✅ <b>Steam Deck Notifier started and connected</b>\n\n\
             Monitoring has begun for region: <b>{}</b>.",
            escape_html(region_code)
        ))
    }
}

/// A detected availability transition that should be announced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    /// Item whose availability changed
    pub item: WatchedItem,
    /// Region the change was observed in
    pub region_code: String,
    /// Newly observed availability
    pub available: bool,
    /// Stored value before this observation (`"true"` / `"false"`)
    pub previous: String,
    /// When the observation was made
    pub observed_at: DateTime<Utc>,
}

impl NotificationIntent {
    /// Render the intent as an HTML message
    pub fn to_message(&self) -> Message {
        let model = escape_html(&self.item.model_name());
        let region = escape_html(&self.region_code);
        let time = self.observed_at.format(TIME_FORMAT);

        if self.available {
            Message::html(format!(
                "🎮 <b>STEAM DECK AVAILABLE!</b>\n\n\
                 📱 Model: {model}\n\
                 🌍 Region: {region}\n\
                 ⏰ Time: {time}\n\n\
                 🚀 <a href=\"{STORE_URL}\">Get it now!</a>"
            ))
        } else {
            Message::html(format!(
                "❌ <b>Steam Deck Out of Stock</b>\n\n\
                 📱 Model: {model}\n\
                 🌍 Region: {region}\n\
                 ⏰ Time: {time}"
            ))
        }
    }
}

/// Escape the characters Telegram's HTML parse mode treats specially
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
