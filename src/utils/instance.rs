//! Guard against arming the shutdown path more than once
//!
//! A development supervisor that restarts the server on code changes runs it
//! as a child process and marks that child through the environment. Only the
//! unmarked process registers signal handling, and only once.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Set to `1` or `true` by a reloading supervisor in its child's environment.
pub const RELOADED_CHILD_ENV: &str = "TIMER_KEEPER_RELOADED_CHILD";

static SHUTDOWN_ARMED: AtomicBool = AtomicBool::new(false);

/// Whether this process is the child of a reloading supervisor.
pub fn is_reloaded_child() -> bool {
    marks_child(std::env::var(RELOADED_CHILD_ENV).ok().as_deref())
}

fn marks_child(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Claim the right to arm the shutdown path.
///
/// Returns true exactly once per primary process, false for reloaded
/// children and for every later call.
pub fn try_arm_shutdown() -> bool {
    if is_reloaded_child() {
        info!("{} is set; shutdown pause left to the supervisor", RELOADED_CHILD_ENV);
        return false;
    }
    if SHUTDOWN_ARMED.swap(true, Ordering::SeqCst) {
        warn!("Shutdown pause already armed in this process");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_child_marker() {
        assert!(marks_child(Some("1")));
        assert!(marks_child(Some("true")));
        assert!(marks_child(Some(" TRUE ")));
        assert!(!marks_child(Some("0")));
        assert!(!marks_child(Some("")));
        assert!(!marks_child(None));
    }
}
