//! Freezing running timers at shutdown

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::state::{Document, TimerRecord, TimerState};

/// What a pause pass did to the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PauseSummary {
    /// Running timers converted to `paused`.
    pub paused: usize,
    /// Running timers with an unusable `endTime`, reset to `default`.
    pub normalized: usize,
    /// Timers left as they were.
    pub untouched: usize,
}

/// Convert every running timer into a paused one as of `now_millis`.
///
/// Never fails. Malformed records are normalized individually and do not
/// affect the rest of the document. Sets `isPaused` on the result.
pub fn pause(doc: Document, now_millis: i64) -> Document {
    pause_with_summary(doc, now_millis).0
}

/// [`pause`], also reporting how many timers were changed.
pub fn pause_with_summary(mut doc: Document, now_millis: i64) -> (Document, PauseSummary) {
    let mut summary = PauseSummary::default();

    for (name, record) in doc.timers.iter_mut() {
        match record.state {
            TimerState::Cooldown => match record.end_time_millis() {
                Some(end_time) => {
                    let remaining = end_time.saturating_sub(now_millis).max(0);
                    debug!("Pausing timer '{}' with {}ms remaining", name, remaining);
                    freeze(record, TimerState::Paused, remaining);
                    summary.paused += 1;
                }
                None => {
                    warn!(
                        "Timer '{}' is running without a usable endTime ({:?}); resetting it",
                        name, record.end_time
                    );
                    freeze(record, TimerState::Default, 0);
                    summary.normalized += 1;
                }
            },
            TimerState::Default | TimerState::Paused | TimerState::Other(_) => {
                summary.untouched += 1;
            }
        }
    }

    doc.is_paused = true;
    (doc, summary)
}

fn freeze(record: &mut TimerRecord, state: TimerState, remaining: i64) {
    record.state = state;
    record.remaining = Some(Value::from(remaining));
}
