// # deckwatchd - Steam Deck availability daemon
//
// This daemon is a thin integration layer. All polling, detection and
// persistence logic lives in deckwatch-core.
//
// The deckwatchd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Opening the file stores and building the adapters
// 4. Running the engine until SIGTERM/SIGINT
//
// ## Configuration
//
// Values are trimmed; an empty variable is treated as unset.
//
// ### Telegram
// - `TELEGRAM_BOT_TOKEN`: Bot token (required)
// - `TELEGRAM_CHAT_ID`: Target chat (required)
//
// ### Monitoring
// - `COUNTRY_CODE`: Two-letter region code (default: DE)
// - `CHECK_INTERVAL`: Seconds between cycles, 10..=86400 (default: 180)
//
// ### Storage
// - `STATUS_FILE`: Status file path (default: /app/data/status.json)
// - `ENABLE_LOGS`: `true` to record every observation (default: false)
// - `LOG_FILE`: Observation log path (default: /app/data/log.json)
//
// ### Logging
// - `LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export TELEGRAM_BOT_TOKEN=123456:your_token
// export TELEGRAM_CHAT_ID=-1001234567890
// export COUNTRY_CODE=SE
// export ENABLE_LOGS=true
//
// deckwatchd
// ```

use anyhow::Result;
use deckwatch_core::{
    EngineConfig, EngineEvent, FileObservationLog, FileStatusStore, MonitorConfig,
    MonitorEngine, NotifierConfig, ObservationLog, StorageConfig,
};
use deckwatch_notifier_telegram::TelegramNotifier;
use deckwatch_source_steam::SteamInventorySource;
use std::env;
use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Default region when `COUNTRY_CODE` is unset
const DEFAULT_COUNTRY_CODE: &str = "DE";

/// Accepted `CHECK_INTERVAL` range in seconds
const CHECK_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 10..=86400;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown (including SIGTERM/SIGINT)
/// - 1: Configuration error, startup failure or runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeckwatchExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown,
    /// Configuration error or startup failure
    ConfigError,
    /// Runtime error (unexpected failure)
    RuntimeError,
}

impl DeckwatchExitCode {
    fn code(self) -> u8 {
        match self {
            DeckwatchExitCode::CleanShutdown => 0,
            DeckwatchExitCode::ConfigError | DeckwatchExitCode::RuntimeError => 1,
        }
    }
}

impl From<DeckwatchExitCode> for ExitCode {
    fn from(code: DeckwatchExitCode) -> Self {
        ExitCode::from(code.code())
    }
}

/// Application configuration
///
/// `Debug` is safe to log: `NotifierConfig` redacts the bot token.
#[derive(Debug)]
struct Config {
    notifier: NotifierConfig,
    country_code: String,
    check_interval_secs: u64,
    storage: StorageConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    ///
    /// Values are trimmed and an empty value counts as unset.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = StorageConfig::default();

        let check_interval_secs = match var("CHECK_INTERVAL") {
            Some(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!(
                    "CHECK_INTERVAL must be a whole number of seconds. Got: {}",
                    raw
                )
            })?,
            None => EngineConfig::default().poll_interval_secs,
        };

        Ok(Self {
            notifier: NotifierConfig::new(
                var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                var("TELEGRAM_CHAT_ID").unwrap_or_default(),
            ),
            country_code: var("COUNTRY_CODE")
                .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string())
                .to_uppercase(),
            check_interval_secs,
            storage: StorageConfig {
                status_path: var("STATUS_FILE").unwrap_or(defaults.status_path),
                log_path: var("LOG_FILE").unwrap_or(defaults.log_path),
                observation_log_enabled: var("ENABLE_LOGS")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            },
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.notifier.bot_token.is_empty() {
            anyhow::bail!(
                "TELEGRAM_BOT_TOKEN is required. \
                Set it via: export TELEGRAM_BOT_TOKEN=your_token"
            );
        }

        if self.notifier.chat_id.is_empty() {
            anyhow::bail!(
                "TELEGRAM_CHAT_ID is required. \
                Set it via: export TELEGRAM_CHAT_ID=your_chat_id"
            );
        }

        if self.country_code.len() != 2
            || !self.country_code.chars().all(|c| c.is_ascii_alphabetic())
        {
            anyhow::bail!(
                "COUNTRY_CODE must be a two-letter country code (e.g. DE, US). Got: '{}'",
                self.country_code
            );
        }

        if !CHECK_INTERVAL_RANGE.contains(&self.check_interval_secs) {
            anyhow::bail!(
                "CHECK_INTERVAL must be between {} and {} seconds. Got: {}",
                CHECK_INTERVAL_RANGE.start(),
                CHECK_INTERVAL_RANGE.end(),
                self.check_interval_secs
            );
        }

        if self.storage.status_path.trim().is_empty() {
            anyhow::bail!("STATUS_FILE cannot be empty");
        }

        if self.storage.observation_log_enabled && self.storage.log_path.trim().is_empty() {
            anyhow::bail!("LOG_FILE cannot be empty when ENABLE_LOGS=true");
        }

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    /// Engine configuration for the default line-up
    fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.country_code.clone()).with_engine(EngineConfig {
            poll_interval_secs: self.check_interval_secs,
            ..EngineConfig::default()
        })
    }
}

fn parse_log_level(raw: &str) -> Option<Level> {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DeckwatchExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DeckwatchExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DeckwatchExitCode::ConfigError.into();
    }

    info!("Starting deckwatchd");
    debug!("Configuration loaded: {:?}", config);

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DeckwatchExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DeckwatchExitCode::RuntimeError
        } else {
            DeckwatchExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Install signal handlers before any work, so a failure here is fatal
    let shutdown_signal = shutdown_signal()?;

    let status_store = Arc::new(FileStatusStore::open(&config.storage.status_path).await);
    info!(
        "Status file: {} ({} entries)",
        status_store.path().display(),
        status_store.len().await
    );

    let observation_log: Option<Arc<dyn ObservationLog>> =
        if config.storage.observation_log_enabled {
            let log = FileObservationLog::open(&config.storage.log_path).await;
            info!("Observation log: {}", log.path().display());
            Some(Arc::new(log))
        } else {
            info!("Observation log disabled");
            None
        };

    let provider = SteamInventorySource::new()?;
    let notifier = TelegramNotifier::new(&config.notifier)?;

    let (engine, events) = MonitorEngine::new(
        Box::new(provider),
        Box::new(notifier),
        status_store,
        observation_log,
        config.monitor_config(),
    )?;

    tokio::spawn(log_events(events));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let signal = shutdown_signal.await;
        info!("Received shutdown signal: {}", signal);
        let _ = shutdown_tx.send(());
    });

    engine.run_with_shutdown(Some(shutdown_rx)).await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Forward engine events to the debug log
async fn log_events(mut events: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = events.recv().await {
        debug!("Engine event: {:?}", event);
    }
}

/// Future that resolves on SIGTERM or SIGINT
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Future that resolves on Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to wait for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        "SIGINT"
    })
}
