//! Shared server state

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::StateStore;
use crate::shutdown::TerminationHook;

/// State shared by every HTTP handler and the shutdown watcher
#[derive(Debug)]
pub struct AppState {
    /// The one store instance for this process
    pub store: Arc<StateStore>,
    /// Shutdown hook bound to `store`
    pub hook: TerminationHook,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Set once the signal path has started
    shutting_down: AtomicBool,
}

impl AppState {
    pub fn new(store: Arc<StateStore>, port: u16, host: String) -> Self {
        Self {
            hook: TerminationHook::new(Arc::clone(&store)),
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Record the last action performed against the store
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Mark the process as terminating. Returns false if it already was.
    pub fn begin_shutdown(&self) -> bool {
        let first = !self.shutting_down.swap(true, Ordering::SeqCst);
        if first {
            info!("Shutdown started");
        }
        first
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

fn format_uptime(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_state(dir: &TempDir) -> AppState {
        let store = Arc::new(StateStore::open(dir.path()).unwrap());
        AppState::new(store, 5000, "127.0.0.1".to_string())
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(7), "7s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3 * 3600 + 61), "3h 1m 1s");
    }

    #[test]
    fn records_last_action() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir);
        assert_eq!(state.get_last_action(), (None, None));

        state.record_action("save");
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("save"));
        assert!(time.is_some());
    }

    #[test]
    fn shutdown_flag_is_set_once() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir);
        assert!(!state.is_shutting_down());
        assert!(state.begin_shutdown());
        assert!(!state.begin_shutdown());
        assert!(state.is_shutting_down());
    }
}
