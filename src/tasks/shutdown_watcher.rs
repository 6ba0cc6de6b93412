//! Shutdown watcher task

use std::sync::Arc;
use tracing::{error, info};

use crate::{
    shutdown::{AfterSave, ShutdownOutcome},
    state::AppState,
    utils::shutdown_signal,
};

/// Wait for a termination signal, then pause and persist all timers.
///
/// Resolves only after the save has finished, so it can be handed to
/// `with_graceful_shutdown` directly. With [`AfterSave::Exit`] the process
/// terminates from inside the hook instead.
pub async fn shutdown_watcher(state: Arc<AppState>, after: AfterSave) {
    if let Err(e) = shutdown_signal().await {
        error!("Signal handling unavailable, shutdown pause disabled: {}", e);
        // Without a signal source there is nothing to wait for; keep serving.
        std::future::pending::<()>().await;
    }

    run_shutdown_pause(state, after).await;
}

/// Refuse further writes and run the termination hook on the blocking pool.
pub async fn run_shutdown_pause(state: Arc<AppState>, after: AfterSave) {
    if !state.begin_shutdown() {
        return;
    }

    let hook = state.hook.clone();
    match tokio::task::spawn_blocking(move || hook.on_termination_requested(after)).await {
        Ok(Ok(ShutdownOutcome::Persisted(summary))) => {
            state.record_action("shutdown-pause");
            info!("Timers paused for shutdown ({} running timers frozen)", summary.paused);
        }
        Ok(Ok(ShutdownOutcome::Skipped)) => {
            info!("Shutdown pause skipped, state file left as is");
        }
        Ok(Err(e)) => error!("Shutdown pause failed: {}", e),
        Err(e) => error!("Shutdown pause task panicked: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::state::{Document, StateStore, TimerRecord, TimerState};
    use tempfile::TempDir;

    #[tokio::test]
    async fn pauses_running_timers_and_blocks_writes() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(StateStore::open(dir.path()).unwrap());
        let far_future = chrono::Utc::now().timestamp_millis() + 3_600_000;
        let mut doc = Document::default();
        doc.timers.insert("heist".into(), TimerRecord::cooldown(far_future));
        store.save(&doc).unwrap();

        let state = Arc::new(AppState::new(Arc::clone(&store), 5000, "127.0.0.1".into()));
        run_shutdown_pause(Arc::clone(&state), AfterSave::Return).await;

        assert!(state.is_shutting_down());
        let saved = store.load();
        assert!(saved.is_paused);
        assert_eq!(saved.timers["heist"].state, TimerState::Paused);
        let remaining = saved.timers["heist"].remaining_millis().unwrap();
        assert!(remaining > 3_500_000 && remaining <= 3_600_000);
        assert_eq!(state.get_last_action().0.as_deref(), Some("shutdown-pause"));
        assert!(matches!(store.save(&doc), Err(StoreError::Sealed)));
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(StateStore::open(dir.path()).unwrap());
        let state = Arc::new(AppState::new(Arc::clone(&store), 5000, "127.0.0.1".into()));

        run_shutdown_pause(Arc::clone(&state), AfterSave::Return).await;
        // Replace the paused file behind the store's back; a second pause
        // would rewrite it.
        std::fs::write(store.path(), r#"{"isPaused":false,"timers":{}}"#).unwrap();
        run_shutdown_pause(Arc::clone(&state), AfterSave::Return).await;

        assert!(!store.load().is_paused);
    }
}
