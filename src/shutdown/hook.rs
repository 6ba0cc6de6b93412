//! Synchronous termination hook shared by every shutdown trigger

use std::sync::Arc;
use chrono::Utc;
use clap::ValueEnum;
use serde::Serialize;
use tracing::{error, info, warn};

use super::pause::{pause_with_summary, PauseSummary};
use crate::{error::StoreError, state::StateStore};

/// What the hook does once the paused document is on disk.
///
/// `Exit` and `Return` both mean the process is going away, so the store is
/// sealed and no later write can replace the paused document. `KeepServing`
/// is for hosts that stay up headless after their window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AfterSave {
    /// Terminate the process immediately (status 1 if the save failed).
    Exit,
    /// Return to the caller and let the host finish its own shutdown.
    #[default]
    Return,
    /// Return and keep accepting writes.
    #[value(skip)]
    KeepServing,
}

impl AfterSave {
    /// Whether the store must refuse writes after the shutdown save.
    pub fn seals_store(self) -> bool {
        !matches!(self, Self::KeepServing)
    }
}

/// Result of a completed termination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShutdownOutcome {
    /// The paused document was saved.
    Persisted(PauseSummary),
    /// The snapshot could not be read; the state file was left untouched.
    Skipped,
}

/// Runs Load → Pause(now) → Save for a signal or a window-close event.
///
/// The hook does not know which trigger fired; callers choose the
/// post-save behaviour with [`AfterSave`].
#[derive(Debug, Clone)]
pub struct TerminationHook {
    store: Arc<StateStore>,
}

impl TerminationHook {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Block until running timers are paused and persisted.
    ///
    /// With [`AfterSave::Exit`] this never returns.
    pub fn on_termination_requested(&self, after: AfterSave) -> Result<ShutdownOutcome, StoreError> {
        let result = self.persist_with(after.seals_store(), || Utc::now().timestamp_millis());

        if after == AfterSave::Exit {
            let code = if result.is_ok() { 0 } else { 1 };
            info!("Shutdown save finished, exiting with status {}", code);
            std::process::exit(code);
        }
        result
    }

    /// Same as [`Self::on_termination_requested`] with a fixed clock, without
    /// sealing the store or exiting.
    pub fn persist_paused_at(&self, now_millis: i64) -> Result<ShutdownOutcome, StoreError> {
        self.persist_with(false, || now_millis)
    }

    /// `clock` is read once, after the snapshot is loaded and under the
    /// store's write lock, so the saved `remaining` values match that instant.
    fn persist_with(&self, seal: bool, clock: impl FnOnce() -> i64) -> Result<ShutdownOutcome, StoreError> {
        let transform = |doc| {
            let now = clock();
            pause_with_summary(doc, now)
        };
        let result = if seal {
            self.store.seal_with(transform)
        } else {
            self.store.update(transform)
        };

        match result {
            Ok(summary) => {
                info!(
                    "Shutdown pause saved: {} paused, {} reset, {} unchanged",
                    summary.paused, summary.normalized, summary.untouched
                );
                Ok(ShutdownOutcome::Persisted(summary))
            }
            Err(e @ StoreError::Read { .. }) => {
                warn!("Could not read state for shutdown pause, leaving it untouched: {}", e);
                Ok(ShutdownOutcome::Skipped)
            }
            Err(StoreError::Sealed) => {
                warn!("State store already sealed, pause not saved again");
                Err(StoreError::Sealed)
            }
            Err(e) => {
                error!("Failed to save paused state: {}", e);
                Err(e)
            }
        }
    }
}
