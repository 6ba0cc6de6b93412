//! Utility functions module
//!
//! Process-level plumbing: signal delivery and the single-instance guard.

pub mod instance;
pub mod signals;

// Re-export main functions
pub use instance::{is_reloaded_child, try_arm_shutdown, RELOADED_CHILD_ENV};
pub use signals::shutdown_signal;
