// # Steam Inventory Source
//
// This crate provides the AvailabilityProvider implementation backed by the
// Steam physical goods inventory API.
//
// ## API
//
// ```text
// GET {api_base}/IPhysicalGoodsService/CheckInventoryAvailableByPackage/v1
//     ?origin=https://store.steampowered.com&country_code=DE&packageid=903907
//
// {"response": {"inventory_available": true}}
// ```
//
// ## Failure Mapping
//
// - Request exceeded the timeout → `NetworkError::Timeout`
// - Non-2xx status → `NetworkError::HttpStatus`
// - Connection failure → `NetworkError::Transport`
// - Body without a usable `inventory_available` → `NetworkError::MalformedResponse`
//
// No retries happen here: the next polling cycle is the retry.

use deckwatch_core::traits::AvailabilityProvider;
use deckwatch_core::{Error, NetworkError, Result, WatchedItem};

use serde_json::Value;
use std::time::Duration;

/// Default Steam Web API base URL
pub const DEFAULT_API_BASE: &str = "https://api.steampowered.com";

/// Inventory endpoint, relative to the API base
const INVENTORY_PATH: &str = "/IPhysicalGoodsService/CheckInventoryAvailableByPackage/v1";

/// Origin the store itself sends with inventory queries
const STORE_ORIGIN: &str = "https://store.steampowered.com";

/// Hard per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Steam inventory availability source
pub struct SteamInventorySource {
    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client
    client: reqwest::Client,
}

impl SteamInventorySource {
    /// Create a source against the public Steam Web API
    pub fn new() -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a source against a custom API base (mirrors, local stubs)
    pub fn with_api_base(api_base: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// API base URL in use
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

fn map_request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        NetworkError::Timeout.into()
    } else {
        Error::transport(e.to_string())
    }
}

#[async_trait::async_trait]
impl AvailabilityProvider for SteamInventorySource {
    async fn fetch(&self, item: &WatchedItem, region_code: &str) -> Result<bool> {
        let url = format!("{}{}", self.api_base, INVENTORY_PATH);

        tracing::debug!(
            "Checking inventory for package {} in {}",
            item.package_id,
            region_code
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", STORE_ORIGIN),
                ("country_code", region_code),
                ("packageid", item.package_id.as_str()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpStatus(status.as_u16()).into());
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout.into()
            } else {
                Error::malformed(format!("Failed to decode body: {}", e))
            }
        })?;

        parse_inventory(&body)
    }

    fn provider_name(&self) -> &'static str {
        "steam"
    }
}

/// Extract `response.inventory_available` from an inventory response body
///
/// Accepts a JSON boolean, the strings `"true"`/`"false"` in any case, and
/// the integers `1`/`0`.
pub fn parse_inventory(body: &Value) -> Result<bool> {
    let value = body
        .get("response")
        .and_then(|response| response.get("inventory_available"))
        .ok_or_else(|| Error::malformed("missing response.inventory_available"))?;

    match value {
        Value::Bool(available) => Ok(*available),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        other => Err(Error::malformed(format!(
            "unexpected inventory_available value: {}",
            other
        ))),
    }
}
