use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::ScheduleEvent;

/// One date in a month view.
#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for leading/trailing days of neighbouring months.
    pub in_month: bool,
    pub event_ids: Vec<String>,
}

/// A month as full Sunday-first weeks.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[DayCell; 7]>,
}

impl MonthGrid {
    /// Returns `None` for an invalid year/month, or when the grid would run
    /// past the representable date range.
    pub fn build(year: i32, month: u32, events: &[ScheduleEvent]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let lead = i64::from(first.weekday().num_days_from_sunday());
        let mut cursor = first.checked_sub_signed(Duration::days(lead))?;

        let mut weeks = Vec::with_capacity(6);
        loop {
            let dates = (0..7)
                .map(|i| cursor.checked_add_signed(Duration::days(i)))
                .collect::<Option<Vec<_>>>()?;
            let week: [DayCell; 7] = std::array::from_fn(|i| {
                let date = dates[i];
                let mut day: Vec<&ScheduleEvent> = events.iter().filter(|e| e.occurs_on(date)).collect();
                day.sort_by_key(|e| e.start_time);
                DayCell {
                    date,
                    in_month: date.month() == month && date.year() == year,
                    event_ids: day.into_iter().map(|e| e.id.clone()).collect(),
                }
            });
            weeks.push(week);
            match cursor.checked_add_signed(Duration::days(7)) {
                Some(next) if next.month() == month && next.year() == year => cursor = next,
                _ => break,
            }
        }

        Some(Self { year, month, weeks })
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.weeks.iter().flatten().find(|c| c.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Planner;
    use crate::storage::Store;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_is_sunday_first_and_covers_month() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let grid = MonthGrid::build(2024, 3, &[]).unwrap();
        assert_eq!(grid.weeks.len(), 6);
        assert_eq!(grid.weeks[0][0].date, ymd(2024, 2, 25));
        assert!(!grid.weeks[0][0].in_month);
        assert_eq!(grid.weeks[0][5].date, ymd(2024, 3, 1));
        assert_eq!(grid.weeks[5][0].date, ymd(2024, 3, 31));
        let in_month = grid.weeks.iter().flatten().filter(|c| c.in_month).count();
        assert_eq!(in_month, 31);
    }

    #[test]
    fn february_exact_fit() {
        // February 2015 starts on Sunday and has 28 days.
        let grid = MonthGrid::build(2015, 2, &[]).unwrap();
        assert_eq!(grid.weeks.len(), 4);
    }

    #[test]
    fn date_range_edges_do_not_panic() {
        for (year, month) in [(NaiveDate::MIN.year(), 1), (NaiveDate::MAX.year(), 12)] {
            if let Some(grid) = MonthGrid::build(year, month, &[]) {
                let in_month = grid.weeks.iter().flatten().filter(|c| c.in_month).count();
                assert_eq!(in_month, 31);
            }
        }
        assert!(MonthGrid::build(NaiveDate::MAX.year() + 1, 1, &[]).is_none());
    }

    #[test]
    fn invalid_month() {
        assert!(MonthGrid::build(2024, 13, &[]).is_none());
    }

    #[test]
    fn weekly_events_fill_matching_days() {
        let store = Store::in_memory();
        let planner = Planner::load(&store);
        let grid = planner.month_grid(2024, 3).unwrap();
        // Mondays in March 2024: 4, 11, 18, 25.
        for d in [4, 11, 18, 25] {
            assert_eq!(grid.cell(ymd(2024, 3, d)).unwrap().event_ids, vec!["1".to_string()]);
        }
        assert!(grid.cell(ymd(2024, 3, 6)).unwrap().event_ids.is_empty());
    }
}
