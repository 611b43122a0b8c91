//! Weekly/monthly planner: schedule events and study goals.
//!
//! Events and goals are stored as two independent records and rewritten in
//! full whenever either list changes.

mod calendar;
mod goals;

pub use calendar::{DayCell, MonthGrid};
pub use goals::{Goal, GoalForm};

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::storage::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Class,
    #[default]
    Study,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: String,
    pub title: String,
    pub day: Weekday,
    /// Specific date; when set, `day` is that date's weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub reminder: bool,
}

impl ScheduleEvent {
    /// Whether this event shows up on `date`.
    ///
    /// Dated events anchor their recurrence at that date; undated events
    /// repeat on their weekday (or every day for `Daily`).
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.date {
            Some(anchor) => {
                if date < anchor {
                    return false;
                }
                match self.recurrence {
                    Recurrence::None => date == anchor,
                    Recurrence::Daily => true,
                    Recurrence::Weekly => date.weekday() == anchor.weekday(),
                    Recurrence::Monthly => date.day() == anchor.day(),
                    Recurrence::Yearly => date.month() == anchor.month() && date.day() == anchor.day(),
                }
            }
            None => match self.recurrence {
                Recurrence::Daily => true,
                _ => date.weekday() == self.day,
            },
        }
    }

    /// `All Day` or a 12-hour range like `9:00 AM - 10:30 AM`.
    pub fn time_label(&self) -> String {
        if self.is_all_day {
            return "All Day".into();
        }
        format!(
            "{} - {}",
            self.start_time.format("%-I:%M %p"),
            self.end_time.format("%-I:%M %p")
        )
    }
}

/// User input for creating or editing an event. Times are `HH:MM`.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub day: Option<Weekday>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_all_day: bool,
    pub kind: EventKind,
    pub recurrence: Recurrence,
    pub subject_id: Option<String>,
    pub reminder: bool,
}

struct ValidEvent {
    title: String,
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl EventForm {
    fn validate(&self) -> Result<ValidEvent, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }

        let (start, end) = if self.is_all_day {
            (all_day_start(), all_day_end())
        } else {
            let start = parse_time("start_time", self.start_time.as_deref())?;
            let end = parse_time("end_time", self.end_time.as_deref())?;
            if end < start {
                return Err(ValidationError::InvalidValue {
                    field: "end_time",
                    message: "must not be before the start time".into(),
                });
            }
            (start, end)
        };

        let day = match self.date {
            Some(date) => date.weekday(),
            None => self.day.unwrap_or(Weekday::Mon),
        };

        Ok(ValidEvent {
            title: title.to_string(),
            day,
            start,
            end,
        })
    }
}

fn all_day_start() -> NaiveTime {
    NaiveTime::MIN
}

fn all_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

fn parse_time(field: &'static str, value: Option<&str>) -> Result<NaiveTime, ValidationError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Err(ValidationError::Required { field });
    };
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ValidationError::InvalidValue {
        field,
        message: format!("'{value}' is not a HH:MM time"),
    })
}

fn seeded_schedule() -> Vec<ScheduleEvent> {
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
    vec![
        ScheduleEvent {
            id: "1".into(),
            title: "Math Class".into(),
            day: Weekday::Mon,
            date: None,
            start_time: at(9, 0),
            end_time: at(10, 30),
            is_all_day: false,
            kind: EventKind::Class,
            recurrence: Recurrence::Weekly,
            subject_id: Some("1".into()),
            reminder: false,
        },
        ScheduleEvent {
            id: "2".into(),
            title: "History Study".into(),
            day: Weekday::Tue,
            date: None,
            start_time: at(14, 0),
            end_time: at(15, 30),
            is_all_day: false,
            kind: EventKind::Study,
            recurrence: Recurrence::Weekly,
            subject_id: Some("2".into()),
            reminder: false,
        },
    ]
}

pub struct Planner<'s> {
    store: &'s Store,
    events: Vec<ScheduleEvent>,
    goals: Vec<Goal>,
}

impl<'s> Planner<'s> {
    pub fn load(store: &'s Store) -> Self {
        Self {
            events: store.read_or(keys::SCHEDULE, seeded_schedule),
            goals: store.read_or(keys::GOALS, goals::seeded_goals),
            store,
        }
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&ScheduleEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Create an event, or update `editing` in place.
    ///
    /// # Errors
    /// Title is required; start and end times are required unless all-day.
    /// Editing an unknown id is also rejected.
    pub fn save_event(
        &mut self,
        form: EventForm,
        editing: Option<&str>,
    ) -> Result<ScheduleEvent, ValidationError> {
        let valid = form.validate()?;
        let event = ScheduleEvent {
            id: editing
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: valid.title,
            day: valid.day,
            date: form.date,
            start_time: valid.start,
            end_time: valid.end,
            is_all_day: form.is_all_day,
            kind: form.kind,
            recurrence: form.recurrence,
            subject_id: form.subject_id.filter(|s| !s.is_empty()),
            reminder: form.reminder,
        };

        match editing {
            Some(id) => {
                let slot = self
                    .events
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| unknown_id("event", id))?;
                *slot = event.clone();
            }
            None => self.events.push(event.clone()),
        }
        self.save_events();
        Ok(event)
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        if removed {
            self.save_events();
        }
        removed
    }

    /// Events whose weekday is `day`, sorted by start time.
    pub fn events_on(&self, day: Weekday) -> Vec<&ScheduleEvent> {
        let mut events: Vec<&ScheduleEvent> = self.events.iter().filter(|e| e.day == day).collect();
        events.sort_by_key(|e| e.start_time);
        events
    }

    /// Events occurring on a specific date, sorted by start time.
    pub fn events_on_date(&self, date: NaiveDate) -> Vec<&ScheduleEvent> {
        let mut events: Vec<&ScheduleEvent> = self.events.iter().filter(|e| e.occurs_on(date)).collect();
        events.sort_by_key(|e| e.start_time);
        events
    }

    /// The first `n` events by start time.
    pub fn upcoming(&self, n: usize) -> Vec<&ScheduleEvent> {
        let mut events: Vec<&ScheduleEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.start_time);
        events.truncate(n);
        events
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Option<MonthGrid> {
        MonthGrid::build(year, month, &self.events)
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Create a goal, or update `editing` in place.
    pub fn save_goal(&mut self, form: GoalForm, editing: Option<&str>) -> Result<Goal, ValidationError> {
        let goal = match editing {
            Some(id) => {
                let slot = self
                    .goals
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| unknown_id("goal", id))?;
                form.apply(slot)?;
                slot.clone()
            }
            None => {
                let goal = form.create()?;
                self.goals.push(goal.clone());
                goal
            }
        };
        self.save_goals();
        Ok(goal)
    }

    /// Flip a goal's completion. Returns the new state, or `None` if unknown.
    pub fn toggle_goal(&mut self, id: &str) -> Option<bool> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.completed = !goal.completed;
        let completed = goal.completed;
        self.save_goals();
        Some(completed)
    }

    pub fn delete_goal(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let removed = self.goals.len() != before;
        if removed {
            self.save_goals();
        }
        removed
    }

    pub fn completed_goals(&self) -> usize {
        self.goals.iter().filter(|g| g.completed).count()
    }

    fn save_events(&self) {
        self.store.write(keys::SCHEDULE, &self.events);
    }

    fn save_goals(&self) {
        self.store.write(keys::GOALS, &self.goals);
    }
}

fn unknown_id(field: &'static str, id: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        message: format!("no {field} with id '{id}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, start: &str, end: &str) -> EventForm {
        EventForm {
            title: title.into(),
            day: Some(Weekday::Wed),
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            ..EventForm::default()
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seeded_schedule_is_loaded() {
        let store = Store::in_memory();
        let planner = Planner::load(&store);
        assert_eq!(planner.events().len(), 2);
        assert_eq!(planner.events_on(Weekday::Mon)[0].title, "Math Class");
    }

    #[test]
    fn title_and_times_are_required() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        assert_eq!(
            planner.save_event(form(" ", "09:00", "10:00"), None).unwrap_err(),
            ValidationError::Required { field: "title" }
        );
        let mut missing = form("Lab", "09:00", "10:00");
        missing.end_time = None;
        assert_eq!(
            planner.save_event(missing, None).unwrap_err(),
            ValidationError::Required { field: "end_time" }
        );
        assert!(planner.save_event(form("Lab", "9am", "10:00"), None).is_err());
        assert!(planner.save_event(form("Lab", "11:00", "10:00"), None).is_err());
        assert_eq!(planner.events().len(), 2);
    }

    #[test]
    fn all_day_events_need_no_times() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        let event = planner
            .save_event(
                EventForm {
                    title: "Exam".into(),
                    is_all_day: true,
                    ..EventForm::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(event.start_time, NaiveTime::MIN);
        assert_eq!(event.end_time, NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(event.day, Weekday::Mon);
        assert_eq!(event.time_label(), "All Day");
    }

    #[test]
    fn date_sets_weekday() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        let mut f = form("Trip", "08:00", "09:00");
        f.date = Some(ymd(2024, 3, 15));
        let event = planner.save_event(f, None).unwrap();
        assert_eq!(event.day, Weekday::Fri);
    }

    #[test]
    fn editing_replaces_fields_and_persists() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        planner
            .save_event(form("Math Lecture", "08:00", "09:15"), Some("1"))
            .unwrap();
        assert!(planner.save_event(form("X", "08:00", "09:00"), Some("nope")).is_err());

        let reloaded = Planner::load(&store);
        let event = reloaded.event("1").unwrap();
        assert_eq!(event.title, "Math Lecture");
        assert_eq!(event.time_label(), "8:00 AM - 9:15 AM");
        assert_eq!(reloaded.events().len(), 2);
    }

    #[test]
    fn events_on_sorts_by_start() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        planner.save_event(form("Late", "18:00", "19:00"), None).unwrap();
        planner.save_event(form("Early", "07:00", "08:00"), None).unwrap();
        let titles: Vec<&str> = planner
            .events_on(Weekday::Wed)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Late"]);
        assert_eq!(planner.upcoming(1)[0].title, "Early");
    }

    #[test]
    fn delete_event() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        assert!(planner.delete_event("2"));
        assert!(!planner.delete_event("2"));
        assert_eq!(Planner::load(&store).events().len(), 1);
    }

    #[test]
    fn recurrence_rules() {
        let store = Store::in_memory();
        let mut planner = Planner::load(&store);
        let mut monthly = form("Review", "10:00", "11:00");
        monthly.date = Some(ymd(2024, 1, 31));
        monthly.recurrence = Recurrence::Monthly;
        let monthly = planner.save_event(monthly, None).unwrap();
        assert!(monthly.occurs_on(ymd(2024, 3, 31)));
        assert!(!monthly.occurs_on(ymd(2024, 2, 29)));
        assert!(!monthly.occurs_on(ymd(2023, 12, 31)));

        let mut yearly = form("Birthday", "10:00", "11:00");
        yearly.date = Some(ymd(2020, 6, 1));
        yearly.recurrence = Recurrence::Yearly;
        let yearly = planner.save_event(yearly, None).unwrap();
        assert!(yearly.occurs_on(ymd(2025, 6, 1)));
        assert!(!yearly.occurs_on(ymd(2025, 6, 2)));

        let once = planner
            .save_event(
                EventForm {
                    date: Some(ymd(2024, 3, 15)),
                    ..form("Once", "10:00", "11:00")
                },
                None,
            )
            .unwrap();
        assert!(once.occurs_on(ymd(2024, 3, 15)));
        assert!(!once.occurs_on(ymd(2024, 3, 22)));

        // Seeded "Math Class" is an undated weekly Monday event.
        assert_eq!(planner.events_on_date(ymd(2024, 3, 11))[0].title, "Math Class");
    }
}
