use capystudy_core::planner::{EventForm, EventKind, GoalForm, Recurrence, ScheduleEvent};
use capystudy_core::storage::keys;
use capystudy_core::{Planner, SubjectBook};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::{Args, Subcommand, ValueEnum};

use crate::common::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum PlannerAction {
    /// Schedule events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Study goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Events for each day of the week
    Week {
        #[arg(long)]
        json: bool,
    },
    /// Calendar grid for a month (defaults to the current one)
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// List all events
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add(EventArgs),
    /// Replace an existing event
    Edit {
        id: String,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event
    Delete { id: String },
}

#[derive(Args)]
pub struct EventArgs {
    title: String,
    /// Weekday (mon, tue, ...); ignored when --date is given
    #[arg(long, value_parser = parse_weekday)]
    day: Option<Weekday>,
    /// Specific date, YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Start time, HH:MM
    #[arg(long)]
    start: Option<String>,
    /// End time, HH:MM
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    all_day: bool,
    #[arg(long = "type", value_enum, default_value_t = KindArg::Study)]
    kind: KindArg,
    #[arg(long, value_enum, default_value_t = RecurrenceArg::None)]
    repeat: RecurrenceArg,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    reminder: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Class,
    Study,
    Other,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecurrenceArg {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// List goals
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a goal
    Add(GoalArgs),
    /// Edit a goal
    Edit {
        id: String,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Flip a goal's completion
    Toggle { id: String },
    /// Delete a goal
    Delete { id: String },
}

#[derive(Args)]
pub struct GoalArgs {
    title: String,
    /// Target minutes (default 60)
    #[arg(long)]
    target: Option<u32>,
    #[arg(long)]
    subject: Option<String>,
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse::<Weekday>().map_err(|_| format!("'{s}' is not a weekday"))
}

impl From<EventArgs> for EventForm {
    fn from(args: EventArgs) -> Self {
        EventForm {
            title: args.title,
            day: args.day,
            date: args.date,
            start_time: args.start,
            end_time: args.end,
            is_all_day: args.all_day,
            kind: match args.kind {
                KindArg::Class => EventKind::Class,
                KindArg::Study => EventKind::Study,
                KindArg::Other => EventKind::Other,
            },
            recurrence: match args.repeat {
                RecurrenceArg::None => Recurrence::None,
                RecurrenceArg::Daily => Recurrence::Daily,
                RecurrenceArg::Weekly => Recurrence::Weekly,
                RecurrenceArg::Monthly => Recurrence::Monthly,
                RecurrenceArg::Yearly => Recurrence::Yearly,
            },
            subject_id: args.subject,
            reminder: args.reminder,
        }
    }
}

impl From<GoalArgs> for GoalForm {
    fn from(args: GoalArgs) -> Self {
        GoalForm {
            title: args.title,
            subject_id: args.subject,
            target_minutes: args.target,
        }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn print_event(event: &ScheduleEvent) {
    let when = match event.date {
        Some(date) => date.to_string(),
        None => event.day.to_string(),
    };
    println!("{:<36}  {:<10} {:<20} {}", event.id, when, event.time_label(), event.title);
}

pub fn run(action: PlannerAction) -> CliResult {
    let store = open_store()?;
    let mut planner = Planner::load(&store);

    match action {
        PlannerAction::Event { action } => match action {
            EventAction::List { json } => {
                if json {
                    return print_json(&planner.events());
                }
                planner.events().iter().for_each(print_event);
            }
            EventAction::Add(args) => {
                let event = planner.save_event(args.into(), None)?;
                println!("Event created: {}", event.id);
            }
            EventAction::Edit { id, event } => {
                planner.save_event(event.into(), Some(&id))?;
                println!("Event updated: {id}");
            }
            EventAction::Delete { id } => {
                if !planner.delete_event(&id) {
                    return Err(format!("no event with id '{id}'").into());
                }
                println!("Event deleted: {id}");
            }
        },
        PlannerAction::Goal { action } => match action {
            GoalAction::List { json } => {
                if json {
                    return print_json(&planner.goals());
                }
                let subjects: SubjectBook = store.read_or_default(keys::SUBJECTS);
                for goal in planner.goals() {
                    let mark = if goal.completed { "x" } else { " " };
                    println!(
                        "[{mark}] {:<36}  {:>4} min  {:>3}%  {}",
                        goal.id,
                        goal.target_minutes,
                        goal.progress(&subjects),
                        goal.title
                    );
                }
                println!("{} / {} completed", planner.completed_goals(), planner.goals().len());
            }
            GoalAction::Add(args) => {
                let goal = planner.save_goal(args.into(), None)?;
                println!("Goal created: {}", goal.id);
            }
            GoalAction::Edit { id, goal } => {
                planner.save_goal(goal.into(), Some(&id))?;
                println!("Goal updated: {id}");
            }
            GoalAction::Toggle { id } => match planner.toggle_goal(&id) {
                Some(done) => println!("{id}: {}", if done { "completed" } else { "open" }),
                None => return Err(format!("no goal with id '{id}'").into()),
            },
            GoalAction::Delete { id } => {
                if !planner.delete_goal(&id) {
                    return Err(format!("no goal with id '{id}'").into());
                }
                println!("Goal deleted: {id}");
            }
        },
        PlannerAction::Week { json } => {
            if json {
                let week: Vec<(Weekday, Vec<&ScheduleEvent>)> =
                    WEEK.iter().map(|d| (*d, planner.events_on(*d))).collect();
                return print_json(&week);
            }
            for day in WEEK {
                println!("{day}");
                for event in planner.events_on(day) {
                    println!("  {:<20} {}", event.time_label(), event.title);
                }
            }
        }
        PlannerAction::Month { year, month, json } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let grid = planner
                .month_grid(year, month)
                .ok_or_else(|| format!("invalid month {year}-{month}"))?;
            if json {
                return print_json(&grid);
            }
            println!("{year}-{month:02}");
            println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
            for week in &grid.weeks {
                let row: Vec<String> = week
                    .iter()
                    .map(|cell| match (cell.in_month, cell.event_ids.len()) {
                        (false, _) => "     ".to_string(),
                        (true, 0) => format!(" {:>2}  ", cell.date.day()),
                        (true, n) => format!(" {:>2}{:<2}", cell.date.day(), format!("*{n}")),
                    })
                    .collect();
                println!("{}", row.concat());
            }
        }
    }
    Ok(())
}
