use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerState};

/// Every timer state change produces an Event.
/// The presentation layer renders them; the desk routes completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// A configured duration changed. `seconds_remaining` is the countdown
    /// after the change, which is unchanged while running.
    DurationChanged {
        mode: TimerMode,
        minutes: u32,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// A focus countdown reached zero with a subject selected.
    FocusSessionCompleted {
        subject_id: String,
        minutes: u32,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero without crediting anything
    /// (a break, or a focus session with no subject selected).
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        seconds_remaining: u64,
        total_seconds: u64,
        selected_subject_id: Option<String>,
        focus_minutes: u32,
        break_minutes: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::ModeSwitched { at, .. }
            | Event::DurationChanged { at, .. }
            | Event::FocusSessionCompleted { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    /// True for the two completion variants.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::FocusSessionCompleted { .. } | Event::TimerCompleted { .. }
        )
    }
}
