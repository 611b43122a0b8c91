//! The study desk: owned application state around the focus timer.
//!
//! `StudyDesk` is the single owner of the timer engine and the subject list.
//! It loads both from the store, persists timer configuration when it
//! changes, and turns a focus-session completion into a subject credit plus
//! a streak update, written together in one batch.

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::events::Event;
use crate::profile::UserProfile;
use crate::storage::{keys, Batch, Store, TimerSettings};
use crate::subjects::{Subject, SubjectBook};
use crate::timer::{positive_minutes, TimerConfig, TimerEngine, TimerMode};

pub struct StudyDesk {
    store: Store,
    engine: TimerEngine,
    subjects: SubjectBook,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// One stored duration, or `fallback` if it is missing or zero.
fn stored_minutes(store: &Store, key: &'static str, fallback: u32) -> u32 {
    let minutes: u32 = store.read_or(key, || fallback);
    positive_minutes(key, minutes).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "stored duration is invalid, using default");
        fallback
    })
}

impl StudyDesk {
    /// Load the desk with the built-in duration defaults.
    pub fn open(store: Store) -> Self {
        Self::open_with(store, &TimerSettings::default())
    }

    /// Load the desk, using `settings` for durations the user has never saved.
    pub fn open_with(store: Store, settings: &TimerSettings) -> Self {
        let fallback = TimerConfig::new(settings.default_focus_minutes, settings.default_break_minutes)
            .unwrap_or_default();
        let focus = stored_minutes(&store, keys::FOCUS_MINUTES, fallback.focus_minutes());
        let brk = stored_minutes(&store, keys::BREAK_MINUTES, fallback.break_minutes());
        let config = TimerConfig::new(focus, brk).unwrap_or(fallback);

        let subjects: SubjectBook = store.read_or_default(keys::SUBJECTS);
        let mut desk = Self {
            store,
            engine: TimerEngine::new(config),
            subjects,
            today: local_today,
        };
        desk.ensure_selection();
        desk
    }

    /// Override the calendar used for streak updates.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn subjects(&self) -> &SubjectBook {
        &self.subjects
    }

    pub fn profile(&self) -> UserProfile {
        self.store.read_or_default(keys::USER_PROFILE)
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.engine.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn toggle(&mut self) -> Option<Event> {
        self.engine.toggle()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.engine.reset()
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.engine.switch_mode(mode)
    }

    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let event = self.engine.set_focus_minutes(minutes)?;
        self.store.write(keys::FOCUS_MINUTES, &minutes);
        Ok(event)
    }

    pub fn set_break_minutes(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let event = self.engine.set_break_minutes(minutes)?;
        self.store.write(keys::BREAK_MINUTES, &minutes);
        Ok(event)
    }

    /// Change either duration. Both values are validated before anything
    /// changes, and the new values are written in one batch.
    ///
    /// # Errors
    /// Returns a validation error if either given value is zero.
    pub fn set_durations(
        &mut self,
        focus: Option<u32>,
        brk: Option<u32>,
    ) -> Result<Vec<Event>, ValidationError> {
        let current = self.engine.config();
        let config = TimerConfig::new(
            focus.unwrap_or(current.focus_minutes()),
            brk.unwrap_or(current.break_minutes()),
        )?;

        let mut events = Vec::new();
        let mut batch = Batch::new();
        if focus.is_some() {
            events.push(self.engine.set_focus_minutes(config.focus_minutes())?);
            batch.put(keys::FOCUS_MINUTES, &config.focus_minutes());
        }
        if brk.is_some() {
            events.push(self.engine.set_break_minutes(config.break_minutes())?);
            batch.put(keys::BREAK_MINUTES, &config.break_minutes());
        }
        self.store.commit(batch);
        Ok(events)
    }

    /// # Errors
    /// Returns a validation error if no subject has that id.
    pub fn select_subject(&mut self, id: &str) -> Result<(), ValidationError> {
        if !self.subjects.contains(id) {
            return Err(ValidationError::InvalidValue {
                field: "subject",
                message: format!("no subject with id '{id}'"),
            });
        }
        self.engine.select_subject(Some(id.to_string()));
        Ok(())
    }

    /// Advance the timer by one second, crediting study time when a focus
    /// session completes.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick()?;
        if let Event::FocusSessionCompleted {
            subject_id,
            minutes,
            ..
        } = &event
        {
            self.complete_focus_session(subject_id, *minutes);
        }
        Some(event)
    }

    // ── Subjects ─────────────────────────────────────────────────────

    pub fn add_subject(&mut self, name: &str, color: Option<&str>) -> Result<Subject, ValidationError> {
        let added = self.subjects.add(name, color)?.clone();
        self.store.write(keys::SUBJECTS, &self.subjects);
        self.ensure_selection();
        Ok(added)
    }

    /// Returns false when the id is unknown or it is the last subject.
    pub fn delete_subject(&mut self, id: &str) -> bool {
        if !self.subjects.delete(id) {
            return false;
        }
        self.store.write(keys::SUBJECTS, &self.subjects);
        self.ensure_selection();
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Keep the selection pointing at an existing subject.
    fn ensure_selection(&mut self) {
        let valid = self
            .engine
            .selected_subject_id()
            .map(|id| self.subjects.contains(id))
            .unwrap_or(false);
        if !valid {
            let first = self.subjects.first_id().map(str::to_string);
            self.engine.select_subject(first);
        }
    }

    fn complete_focus_session(&mut self, subject_id: &str, minutes: u32) {
        if !self.subjects.add_minutes(subject_id, minutes) {
            return;
        }
        let mut profile = self.profile();
        let streak = profile.streak.record_session((self.today)());

        let mut batch = Batch::new();
        batch
            .put(keys::SUBJECTS, &self.subjects)
            .put(keys::USER_PROFILE, &profile);
        self.store.commit(batch);
        tracing::info!(subject_id, minutes, streak, "focus session credited");
    }
}

impl std::fmt::Debug for StudyDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyDesk")
            .field("engine", &self.engine)
            .field("subjects", &self.subjects)
            .finish_non_exhaustive()
    }
}
