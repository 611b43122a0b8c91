mod engine;
pub mod ticker;

pub use engine::{format_clock, TimerConfig, TimerEngine, TimerMode, TimerState};
pub use ticker::Ticker;

pub(crate) use engine::positive_minutes;
