//! Core traits for deckwatch
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AvailabilityProvider`]: Fetch the current availability of one item
//! - [`Notifier`]: Deliver a formatted message to a channel
//! - [`StatusStore`]: Durable last-known availability per item
//! - [`ObservationLog`]: Append-only history of observations

pub mod availability;
pub mod notifier;
pub mod observation_log;
pub mod status_store;

pub use availability::AvailabilityProvider;
pub use notifier::Notifier;
pub use observation_log::{ObservationLog, ObservationLogEntry};
pub use status_store::StatusStore;
