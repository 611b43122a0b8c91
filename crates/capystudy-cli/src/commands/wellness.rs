use capystudy_core::wellness::Mood;
use capystudy_core::{Config, StudyAssistant, WellnessJournal};
use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};

use crate::common::{block_on, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum WellnessAction {
    /// Update a day's log; unspecified fields keep their value
    Log {
        #[arg(long, value_enum)]
        mood: Option<MoodArg>,
        /// Water intake in ml
        #[arg(long)]
        water: Option<u32>,
        #[arg(long)]
        sleep: Option<f32>,
        #[arg(long)]
        steps: Option<u32>,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show today's log
    Today,
    /// Mood, water and sleep for this week, Monday to Sunday
    Week {
        #[arg(long)]
        json: bool,
    },
    /// Ask Capy for tips based on the last seven logs
    Insights,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MoodArg {
    Happy,
    Neutral,
    Stressed,
    Tired,
    Energetic,
}

impl From<MoodArg> for Mood {
    fn from(arg: MoodArg) -> Self {
        match arg {
            MoodArg::Happy => Mood::Happy,
            MoodArg::Neutral => Mood::Neutral,
            MoodArg::Stressed => Mood::Stressed,
            MoodArg::Tired => Mood::Tired,
            MoodArg::Energetic => Mood::Energetic,
        }
    }
}

pub fn run(action: WellnessAction, config: &Config) -> CliResult {
    let store = open_store()?;
    let mut journal = WellnessJournal::load(&store);
    let today = Local::now().date_naive();

    match action {
        WellnessAction::Log {
            mood,
            water,
            sleep,
            steps,
            date,
        } => {
            let mut log = journal.today(date.unwrap_or(today));
            if let Some(mood) = mood {
                log.mood = mood.into();
            }
            if let Some(water) = water {
                log.water_intake = water;
            }
            if let Some(sleep) = sleep {
                log.sleep_hours = sleep.max(0.0);
            }
            if let Some(steps) = steps {
                log.steps = steps;
            }
            if journal.upsert(log.clone()) {
                println!("Logged {}", log.date);
            } else {
                println!("No changes for {}", log.date);
            }
        }
        WellnessAction::Today => print_json(&journal.today(today))?,
        WellnessAction::Week { json } => {
            let chart = journal.week_chart(today);
            if json {
                return print_json(&chart);
            }
            println!("Day  Mood  Water(ml)  Sleep(h)");
            for point in chart {
                println!(
                    "{:<4} {:>4}  {:>9}  {:>8.1}",
                    point.label, point.mood_score, point.water_intake, point.sleep_hours
                );
            }
        }
        WellnessAction::Insights => {
            let assistant = StudyAssistant::from_config(&config.assistant)?;
            let recent = journal.recent(7).to_vec();
            let text = block_on(async move { assistant.get_wellness_insights(&recent).await })?;
            println!("{text}");
        }
    }
    Ok(())
}
