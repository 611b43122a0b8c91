//! # CapyStudy Core Library
//!
//! Core logic for the CapyStudy study companion. Everything the app does is
//! available here and driven by the `capystudy` CLI binary.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven countdown state machine; the caller
//!   invokes `tick()` once per second, usually from a [`timer::Ticker`]
//! - **Study Desk**: owns the engine and the subject list, crediting
//!   studied minutes and the daily streak when a focus session completes
//! - **Storage**: a key-value record store (SQLite or in-memory) plus
//!   TOML-based configuration
//! - **Collaborators**: planner, notebook, wellness journal, profile and the
//!   language-model assistant, each reading and writing its own records
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`StudyDesk`]: owned application state around the timer
//! - [`Store`]: typed record access over a [`KeyValueStore`]
//! - [`Config`]: application configuration management

pub mod assistant;
pub mod audio;
pub mod dashboard;
pub mod desk;
pub mod error;
pub mod events;
pub mod notebook;
pub mod planner;
pub mod profile;
pub mod storage;
pub mod streak;
pub mod subjects;
pub mod timer;
pub mod wellness;

pub use assistant::{ChatSession, GeminiClient, StudyAssistant};
pub use audio::{AmbientMixer, AudioChannel};
pub use dashboard::Dashboard;
pub use desk::StudyDesk;
pub use error::{AssistantError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notebook::Notebook;
pub use planner::Planner;
pub use profile::{Account, UserProfile};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Store};
pub use streak::StudyStreak;
pub use subjects::{Subject, SubjectBook};
pub use timer::{TimerConfig, TimerEngine, TimerMode, TimerState};
pub use wellness::WellnessJournal;
