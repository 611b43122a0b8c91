//! Consecutive-day study streak.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyStreak {
    pub streak: u32,
    pub last_study_date: NaiveDate,
}

impl Default for StudyStreak {
    fn default() -> Self {
        Self {
            streak: 5,
            last_study_date: Local::now().date_naive() - Duration::days(1),
        }
    }
}

impl StudyStreak {
    pub fn new(streak: u32, last_study_date: NaiveDate) -> Self {
        Self {
            streak,
            last_study_date,
        }
    }

    /// Record a completed focus session on `today` and return the new streak.
    ///
    /// One day after the last session extends the streak, a longer gap
    /// restarts it at 1, and the same day leaves it as is.
    pub fn record_session(&mut self, today: NaiveDate) -> u32 {
        let gap = (today - self.last_study_date).num_days().abs();
        match gap {
            0 => {}
            1 => self.streak = self.streak.saturating_add(1),
            _ => self.streak = 1,
        }
        self.last_study_date = today;
        self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn next_day_extends() {
        let mut s = StudyStreak::new(5, day(10));
        assert_eq!(s.record_session(day(11)), 6);
        assert_eq!(s.last_study_date, day(11));
    }

    #[test]
    fn same_day_is_unchanged() {
        let mut s = StudyStreak::new(5, day(10));
        assert_eq!(s.record_session(day(10)), 5);
    }

    #[test]
    fn gap_restarts_at_one() {
        let mut s = StudyStreak::new(9, day(10));
        assert_eq!(s.record_session(day(13)), 1);
    }

    #[test]
    fn month_boundary_counts_as_next_day() {
        let mut s = StudyStreak::new(2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(s.record_session(day(1)), 3);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: StudyStreak = serde_json::from_str(r#"{"streak":3}"#).unwrap();
        assert_eq!(s.streak, 3);
        assert_eq!(s.last_study_date, StudyStreak::default().last_study_date);
    }

    #[test]
    fn default_is_yesterday() {
        let s = StudyStreak::default();
        assert_eq!(s.streak, 5);
        let today = Local::now().date_naive();
        assert_eq!((today - s.last_study_date).num_days(), 1);
    }
}
