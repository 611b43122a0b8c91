//! Keys of the independently stored records.
//!
//! Each key holds one whole record that is rewritten on every mutation.

pub const FOCUS_MINUTES: &str = "pomodoroFocus";
pub const BREAK_MINUTES: &str = "pomodoroBreak";
pub const SUBJECTS: &str = "subjects";
pub const SCHEDULE: &str = "schedule";
pub const GOALS: &str = "goals";
pub const NOTES: &str = "notes";
pub const NOTE_FOLDERS: &str = "noteFolders";
pub const WELLNESS_LOGS: &str = "wellnessLogs";
pub const USER_PROFILE: &str = "userProfile";
pub const LOGGED_IN: &str = "isLoggedIn";
