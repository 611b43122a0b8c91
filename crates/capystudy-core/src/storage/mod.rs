mod config;
pub mod database;
pub mod keys;
mod kv;

pub use config::{AssistantConfig, AudioConfig, Config, LogConfig, TimerSettings};
pub use database::Database;
pub use kv::{Batch, KeyValueStore, MemoryStore, Store};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/capystudy[-dev]/` based on CAPYSTUDY_ENV.
///
/// Set CAPYSTUDY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CAPYSTUDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("capystudy-dev")
    } else {
        base_dir.join("capystudy")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
