//! State management module
//!
//! The persisted document, its crash-safe store, and the shared server state.

pub mod app_state;
pub mod document;
pub mod store;

// Re-export main types
pub use app_state::AppState;
pub use document::{Document, StateCounts, TimerRecord, TimerState};
pub use store::{StateStore, STATE_FILE_NAME};
