//! Timer Keeper - crash-safe persistence for named countdown timers
//!
//! This library stores the timer document atomically and, when the host is
//! told to terminate, freezes every running timer into a paused one before
//! the process goes away.

pub mod config;
pub mod error;
pub mod state;
pub mod shutdown;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::StoreError;
pub use state::{AppState, Document, StateStore, TimerRecord, TimerState};
pub use shutdown::{pause, AfterSave, ShutdownOutcome, TerminationHook};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
