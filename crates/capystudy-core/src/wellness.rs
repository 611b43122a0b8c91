//! Daily wellness logs: mood, water, sleep and steps.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::storage::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Stressed,
    Tired,
    Energetic,
}

impl Mood {
    pub fn score(self) -> u8 {
        match self {
            Mood::Stressed => 1,
            Mood::Tired => 2,
            Mood::Neutral => 3,
            Mood::Happy => 4,
            Mood::Energetic => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub mood: Mood,
    /// Millilitres.
    #[serde(default)]
    pub water_intake: u32,
    #[serde(default)]
    pub sleep_hours: f32,
    #[serde(default)]
    pub steps: u32,
}

impl WellnessLog {
    /// Neutral entry with zero counts.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mood: Mood::Neutral,
            water_intake: 0,
            sleep_hours: 0.0,
            steps: 0,
        }
    }
}

/// One day of the weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// Short weekday label, `Mon`..`Sun`.
    pub label: String,
    pub mood_score: u8,
    pub water_intake: u32,
    pub sleep_hours: f32,
}

fn seeded_logs() -> Vec<WellnessLog> {
    let entry = |d, mood, water, sleep, steps| WellnessLog {
        date: NaiveDate::from_ymd_opt(2023, 5, d).unwrap_or_default(),
        mood,
        water_intake: water,
        sleep_hours: sleep,
        steps,
    };
    vec![
        entry(20, Mood::Happy, 2000, 7.0, 8000),
        entry(21, Mood::Neutral, 1500, 6.0, 5000),
        entry(22, Mood::Stressed, 1000, 5.0, 3000),
        entry(23, Mood::Energetic, 2500, 8.0, 10000),
        entry(24, Mood::Happy, 2200, 7.5, 9000),
    ]
}

pub struct WellnessJournal<'s> {
    store: &'s Store,
    logs: Vec<WellnessLog>,
}

impl<'s> WellnessJournal<'s> {
    pub fn load(store: &'s Store) -> Self {
        Self {
            logs: store.read_or(keys::WELLNESS_LOGS, seeded_logs),
            store,
        }
    }

    pub fn logs(&self) -> &[WellnessLog] {
        &self.logs
    }

    /// The log for `date`, or a neutral empty one.
    pub fn today(&self, date: NaiveDate) -> WellnessLog {
        self.logs
            .iter()
            .find(|l| l.date == date)
            .cloned()
            .unwrap_or_else(|| WellnessLog::empty(date))
    }

    /// Insert or replace the log for its date. Returns false when nothing changed.
    pub fn upsert(&mut self, log: WellnessLog) -> bool {
        match self.logs.iter_mut().find(|l| l.date == log.date) {
            Some(existing) if *existing == log => return false,
            Some(existing) => *existing = log,
            None => self.logs.push(log),
        }
        self.store.write(keys::WELLNESS_LOGS, &self.logs);
        true
    }

    /// Monday to Sunday of the week containing `today`. Missing days are
    /// neutral with zero counts.
    pub fn week_chart(&self, today: NaiveDate) -> Vec<ChartPoint> {
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        (0..7)
            .map(|i| {
                let date = monday + Duration::days(i);
                let log = self.today(date);
                ChartPoint {
                    date,
                    label: date.format("%a").to_string(),
                    mood_score: log.mood.score(),
                    water_intake: log.water_intake,
                    sleep_hours: log.sleep_hours,
                }
            })
            .collect()
    }

    /// The last `n` logs in stored order.
    pub fn recent(&self, n: usize) -> &[WellnessLog] {
        let start = self.logs.len().saturating_sub(n);
        &self.logs[start..]
    }
}
