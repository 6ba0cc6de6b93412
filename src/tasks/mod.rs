//! Background tasks module
//!
//! This module contains tasks that run alongside the HTTP server.

pub mod shutdown_watcher;

// Re-export main functions
pub use shutdown_watcher::{run_shutdown_pause, shutdown_watcher};
