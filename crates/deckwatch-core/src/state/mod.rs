// # State Store Implementations
//
// This module provides implementations of the StatusStore and ObservationLog
// traits for different persistence strategies.

mod json_file;

pub mod file;
pub mod journal;
pub mod memory;

pub use file::FileStatusStore;
pub use journal::FileObservationLog;
pub use memory::{MemoryObservationLog, MemoryStatusStore};
