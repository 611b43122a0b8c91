pub mod ask;
pub mod config;
pub mod dashboard;
pub mod notes;
pub mod planner;
pub mod profile;
pub mod subject;
pub mod timer;
pub mod wellness;
