// # Telegram Notifier
//
// This crate provides the Notifier implementation for the Telegram Bot API.
//
// ## Behavior
//
// - One `sendMessage` call per message, no retries (the engine logs failures
//   and moves on)
// - HTML messages are sent with `parse_mode: "HTML"`, plain ones without
// - A non-2xx status or `{"ok": false}` is a failure carrying the API
//   `description`
//
// ## Security Requirements
//
// - The bot token is part of the request URL, so it NEVER appears in logs,
//   error messages or `Debug` output
// - Empty credentials are rejected at construction
//
// ## API Reference
//
// - Bot API: https://core.telegram.org/bots/api#sendmessage
// - POST `/bot<token>/sendMessage` with `{chat_id, text, parse_mode}`

use async_trait::async_trait;
use deckwatch_core::traits::Notifier;
use deckwatch_core::{Error, Message, MessageFormat, NotifierConfig, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Telegram Bot API base URL
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Characters of the message text echoed in debug logs
const LOG_PREVIEW_CHARS: usize = 50;

/// Request body for `sendMessage`
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

/// The parts of a Bot API response we care about
#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API notifier
pub struct TelegramNotifier {
    /// Bot token
    /// ⚠️ NEVER log this value
    bot_token: String,

    /// Target chat
    chat_id: String,

    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the bot token
impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramNotifier {
    /// Create a notifier against the public Bot API
    ///
    /// Fails with `Error::Config` if the token or chat id is empty.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Create a notifier against a custom API base (local Bot API server, stubs)
    pub fn with_api_base(config: &NotifierConfig, api_base: impl Into<String>) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &message.text,
            parse_mode: match message.format {
                MessageFormat::Html => Some("HTML"),
                MessageFormat::Plain => None,
            },
        };

        // without_url() keeps the token out of the error text
        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::notifier(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let api: ApiResponse = response.json().await.unwrap_or_default();

        if !status.is_success() || !api.ok {
            let description = api
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(Error::notifier(format!(
                "Telegram API error ({}): {}",
                status.as_u16(),
                description
            )));
        }

        tracing::debug!(
            "Telegram notification sent: {}...",
            preview(&message.text)
        );
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "telegram"
    }
}

/// First characters of a message, cut on a char boundary
fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_credentials() {
        let err = TelegramNotifier::new(&NotifierConfig::new("", "42")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = TelegramNotifier::new(&NotifierConfig::new("123:abc", " ")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn debug_output_hides_token() {
        let notifier = TelegramNotifier::new(&NotifierConfig::new("123:secret", "42")).unwrap();
        let debug = format!("{:?}", notifier);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<REDACTED>"));
        assert_eq!(notifier.channel_name(), "telegram");
    }

    #[test]
    fn plain_messages_omit_parse_mode() {
        let body = SendMessageRequest {
            chat_id: "42",
            text: "hi",
            parse_mode: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": "42", "text": "hi"}));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = "🎮".repeat(60);
        assert_eq!(preview(&text).chars().count(), LOG_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
