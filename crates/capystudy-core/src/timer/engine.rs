//! Focus timer engine.
//!
//! The engine is a plain state machine with no internal thread. The owner
//! drives it by calling `tick()` once per second while it is running (see
//! [`super::ticker`]). Missed ticks are never replayed; the countdown only
//! moves when `tick()` is called.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Idle
//! Running --tick (reaches 0)--> Completed --> Idle (same mode, full duration)
//! any --reset--> Idle
//! ```
//!
//! ## Usage
//!
//! ```
//! use capystudy_core::timer::{TimerConfig, TimerEngine};
//!
//! let mut engine = TimerEngine::new(TimerConfig::new(1, 1).unwrap());
//! engine.select_subject(Some("1".into()));
//! engine.start();
//! let mut completed = None;
//! for _ in 0..60 {
//!     if let Some(event) = engine.tick() {
//!         completed = Some(event);
//!     }
//! }
//! assert!(completed.is_some());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Rest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Configured durations, in whole minutes. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    focus_minutes: u32,
    break_minutes: u32,
}

impl TimerConfig {
    /// # Errors
    /// Returns a validation error if either duration is zero.
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            focus_minutes: positive_minutes("focus_minutes", focus_minutes)?,
            break_minutes: positive_minutes("break_minutes", break_minutes)?,
        })
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.break_minutes,
        }
    }

    pub fn seconds_for(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes_for(mode)) * 60
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
        }
    }
}

pub(crate) fn positive_minutes(field: &'static str, minutes: u32) -> Result<u32, ValidationError> {
    if minutes == 0 {
        return Err(ValidationError::InvalidValue {
            field,
            message: "must be at least 1 minute".into(),
        });
    }
    Ok(minutes)
}

/// Core timer engine. Session state is ephemeral and never persisted.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfig,
    mode: TimerMode,
    state: TimerState,
    seconds_remaining: u64,
    selected_subject_id: Option<String>,
}

impl TimerEngine {
    /// Create an idle engine in Focus mode with a full countdown.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            mode: TimerMode::Focus,
            state: TimerState::Idle,
            seconds_remaining: config.seconds_for(TimerMode::Focus),
            selected_subject_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn selected_subject_id(&self) -> Option<&str> {
        self.selected_subject_id.as_deref()
    }

    /// Full duration of the current mode, in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.config.seconds_for(self.mode)
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.seconds_remaining as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.seconds_remaining)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            seconds_remaining: self.seconds_remaining,
            total_seconds: self.total_seconds(),
            selected_subject_id: self.selected_subject_id.clone(),
            focus_minutes: self.config.focus_minutes,
            break_minutes: self.config.break_minutes,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                tracing::debug!(mode = ?self.mode, remaining = self.seconds_remaining, "timer started");
                Some(Event::TimerStarted {
                    mode: self.mode,
                    seconds_remaining: self.seconds_remaining,
                    at: Utc::now(),
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Idle;
                tracing::debug!(remaining = self.seconds_remaining, "timer paused");
                Some(Event::TimerPaused {
                    mode: self.mode,
                    seconds_remaining: self.seconds_remaining,
                    at: Utc::now(),
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => self.start(),
            TimerState::Running => self.pause(),
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.seconds_remaining = self.total_seconds();
        Some(Event::TimerReset {
            mode: self.mode,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Switch between Focus and ShortBreak. Rejected (returns `None`, nothing
    /// changes) while the countdown is running.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Option<Event> {
        if self.is_running() {
            tracing::debug!(requested = ?mode, "ignoring mode switch while running");
            return None;
        }
        self.mode = mode;
        self.state = TimerState::Idle;
        self.seconds_remaining = self.total_seconds();
        Some(Event::ModeSwitched {
            mode,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn select_subject(&mut self, subject_id: Option<String>) {
        self.selected_subject_id = subject_id;
    }

    /// # Errors
    /// Returns a validation error for zero; nothing changes in that case.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        self.config.focus_minutes = positive_minutes("focus_minutes", minutes)?;
        Ok(self.duration_changed(TimerMode::Focus))
    }

    /// # Errors
    /// Returns a validation error for zero; nothing changes in that case.
    pub fn set_break_minutes(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        self.config.break_minutes = positive_minutes("break_minutes", minutes)?;
        Ok(self.duration_changed(TimerMode::ShortBreak))
    }

    /// Advance the countdown by one second. Only acts while running.
    ///
    /// Returns the completion event when the countdown reaches zero, after
    /// which the engine is idle in the same mode with a full countdown.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }

        let at = Utc::now();
        let event = match (self.mode, &self.selected_subject_id) {
            (TimerMode::Focus, Some(subject_id)) => Event::FocusSessionCompleted {
                subject_id: subject_id.clone(),
                minutes: self.config.focus_minutes,
                at,
            },
            (mode, _) => Event::TimerCompleted { mode, at },
        };
        tracing::info!(mode = ?self.mode, "countdown completed");

        self.state = TimerState::Idle;
        self.seconds_remaining = self.total_seconds();
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn duration_changed(&mut self, mode: TimerMode) -> Event {
        // A running countdown keeps its sample until the next idle transition.
        if !self.is_running() && self.mode == mode {
            self.seconds_remaining = self.total_seconds();
        }
        Event::DurationChanged {
            mode,
            minutes: self.config.minutes_for(mode),
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }
    }
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
