//! Persisted document structure

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of a single timer.
///
/// The frontend may write states the core does not govern (for example
/// `ready`); those are kept in `Other` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimerState {
    /// Idle or reset, no timing data.
    #[default]
    Default,
    /// Actively counting down toward `endTime`.
    Cooldown,
    /// Stopped with `remaining` frozen.
    Paused,
    Other(String),
}

impl TimerState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Cooldown => "cooldown",
            Self::Paused => "paused",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TimerState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "default" => Self::Default,
            "cooldown" => Self::Cooldown,
            "paused" => Self::Paused,
            _ => Self::Other(s),
        }
    }
}

impl From<TimerState> for String {
    fn from(state: TimerState) -> Self {
        match state {
            TimerState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named timer as stored on disk
///
/// `endTime` and `remaining` are kept exactly as the client sent them (the
/// frontend writes numeric strings as often as numbers). Use
/// [`TimerRecord::end_time_millis`] and [`TimerRecord::remaining_millis`] to
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    #[serde(default)]
    pub state: TimerState,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Value>,
    /// UI-only fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimerRecord {
    /// An idle timer with no timing data.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A running timer due at `end_time` (epoch milliseconds).
    pub fn cooldown(end_time: i64) -> Self {
        Self {
            state: TimerState::Cooldown,
            end_time: Some(Value::from(end_time)),
            ..Self::default()
        }
    }

    /// A paused timer with `remaining` milliseconds left.
    pub fn paused(remaining: i64) -> Self {
        Self {
            state: TimerState::Paused,
            remaining: Some(Value::from(remaining)),
            ..Self::default()
        }
    }

    /// `endTime` as epoch milliseconds, if it holds a usable number.
    pub fn end_time_millis(&self) -> Option<i64> {
        self.end_time.as_ref().and_then(millis_from_value)
    }

    /// `remaining` as milliseconds, if it holds a usable number.
    pub fn remaining_millis(&self) -> Option<i64> {
        self.remaining.as_ref().and_then(millis_from_value)
    }
}

/// Accepts numbers and numeric strings. Fractions are truncated toward zero
/// and out-of-range values saturate at the `i64` bounds.
fn millis_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_millis)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_millis))
        }
        _ => None,
    }
}

fn truncate_millis(f: f64) -> Option<i64> {
    // `as` saturates, so only NaN and the infinities need rejecting.
    f.is_finite().then(|| f.trunc() as i64)
}

/// The root persisted object: global pause flag plus the timer map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "isPaused", default)]
    pub is_paused: bool,
    #[serde(default)]
    pub timers: IndexMap<String, TimerRecord>,
    /// Unknown top-level keys, preserved on round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Number of timers in each state.
    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for record in self.timers.values() {
            match record.state {
                TimerState::Default => counts.default += 1,
                TimerState::Cooldown => counts.cooldown += 1,
                TimerState::Paused => counts.paused += 1,
                TimerState::Other(_) => counts.other += 1,
            }
        }
        counts
    }
}

/// Per-state timer counts, reported by `/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub default: usize,
    pub cooldown: usize,
    pub paused: usize,
    pub other: usize,
}
