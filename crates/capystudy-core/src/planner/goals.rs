use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::subjects::SubjectBook;

pub const DEFAULT_TARGET_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub subject_id: String,
    pub title: String,
    #[serde(default = "default_target")]
    pub target_minutes: u32,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Percent of the target covered by the linked subject's total study
    /// time, capped at 100. Zero when the subject no longer exists.
    pub fn progress(&self, subjects: &SubjectBook) -> u8 {
        let Some(subject) = subjects.get(&self.subject_id) else {
            return 0;
        };
        let target = u64::from(self.target_minutes.max(1));
        (subject.total_time_studied.saturating_mul(100) / target).min(100) as u8
    }
}

fn default_target() -> u32 {
    DEFAULT_TARGET_MINUTES
}

/// User input for a goal. A zero or missing target means the default.
#[derive(Debug, Clone, Default)]
pub struct GoalForm {
    pub title: String,
    pub subject_id: Option<String>,
    pub target_minutes: Option<u32>,
}

impl GoalForm {
    fn title(&self) -> Result<&str, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        Ok(title)
    }

    fn target(&self) -> u32 {
        self.target_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_TARGET_MINUTES)
    }

    pub(super) fn create(&self) -> Result<Goal, ValidationError> {
        Ok(Goal {
            id: Uuid::new_v4().to_string(),
            subject_id: self.subject_id.clone().unwrap_or_default(),
            title: self.title()?.to_string(),
            target_minutes: self.target(),
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// Overwrite the editable fields, keeping id, completion and creation time.
    pub(super) fn apply(&self, goal: &mut Goal) -> Result<(), ValidationError> {
        goal.title = self.title()?.to_string();
        goal.target_minutes = self.target();
        if let Some(subject_id) = &self.subject_id {
            goal.subject_id = subject_id.clone();
        }
        Ok(())
    }
}

pub(super) fn seeded_goals() -> Vec<Goal> {
    let now = Utc::now();
    vec![
        Goal {
            id: "1".into(),
            subject_id: "1".into(),
            title: "Finish Algebra Chapter".into(),
            target_minutes: 120,
            completed: false,
            created_at: now,
        },
        Goal {
            id: "2".into(),
            subject_id: "3".into(),
            title: "Write Lab Report".into(),
            target_minutes: 60,
            completed: true,
            created_at: now,
        },
    ]
}
