//! Read-only overview assembled from the other records.

use serde::Serialize;

use crate::planner::{Planner, ScheduleEvent};
use crate::profile::UserProfile;
use crate::storage::{keys, Store};
use crate::subjects::{Subject, SubjectBook};

const UPCOMING_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    pub total_minutes: u64,
    pub streak: u32,
    pub goals_completed: usize,
    pub goals_total: usize,
    pub subjects: Vec<Subject>,
    pub upcoming: Vec<ScheduleEvent>,
}

impl Dashboard {
    pub fn load(store: &Store) -> Self {
        let subjects: SubjectBook = store.read_or_default(keys::SUBJECTS);
        let profile: UserProfile = store.read_or_default(keys::USER_PROFILE);
        let planner = Planner::load(store);

        Self {
            name: profile.name,
            total_minutes: subjects.total_minutes(),
            streak: profile.streak.streak,
            goals_completed: planner.completed_goals(),
            goals_total: planner.goals().len(),
            subjects: subjects.list().to_vec(),
            upcoming: planner.upcoming(UPCOMING_LIMIT).into_iter().cloned().collect(),
        }
    }

    pub fn total_time_label(&self) -> String {
        format_hours_minutes(self.total_minutes)
    }
}

/// `Xh Ym`.
pub fn format_hours_minutes(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
