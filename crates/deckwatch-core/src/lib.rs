// # deckwatch-core
//
// Core library for the deckwatch availability monitor.
//
// ## Architecture Overview
//
// This library provides everything except the concrete network adapters:
// - **AvailabilityProvider**: Trait for fetching the current availability of one item
// - **Notifier**: Trait for delivering a formatted message to a single channel
// - **StatusStore**: Trait for the durable last-known availability per item
// - **ObservationLog**: Trait for the optional append-only observation history
// - **TransitionDetector**: Compares a fresh observation with stored history
// - **MonitorEngine**: Polling scheduler that drives fetch → detect → notify
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from provider and channel implementations
// 2. **Sequential**: Items are processed one at a time, cycles never overlap
// 3. **Injectable State**: Stores are passed into the engine, never held as globals
// 4. **Library-First**: All core functionality can be used as a library
// 5. **At Most One Notification Per Transition**: State is persisted before notifying

pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{
    DisplayType, EngineConfig, MonitorConfig, NotifierConfig, StorageConfig, WatchedItem,
};
pub use engine::{CycleSummary, EngineEvent, MonitorEngine, TransitionDetector};
pub use error::{Error, NetworkError, Result};
pub use message::{Message, MessageFormat, NotificationIntent};
pub use state::{FileObservationLog, FileStatusStore, MemoryObservationLog, MemoryStatusStore};
pub use traits::{AvailabilityProvider, Notifier, ObservationLog, ObservationLogEntry, StatusStore};
