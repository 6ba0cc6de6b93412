//! Shutdown handling
//!
//! Converts running timers into paused ones and persists the result before
//! the process is allowed to go away.

pub mod hook;
pub mod pause;

pub use hook::{AfterSave, ShutdownOutcome, TerminationHook};
pub use pause::{pause, pause_with_summary, PauseSummary};
