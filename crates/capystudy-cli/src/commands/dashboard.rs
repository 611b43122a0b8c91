use capystudy_core::dashboard::format_hours_minutes;
use capystudy_core::Dashboard;

use crate::common::{open_store, print_json, CliResult};

pub fn run(json: bool) -> CliResult {
    let store = open_store()?;
    let dash = Dashboard::load(&store);
    if json {
        return print_json(&dash);
    }

    println!("Welcome back, {}!", dash.name);
    println!("Total study time:  {}", dash.total_time_label());
    println!("Streak:            {} days", dash.streak);
    println!("Goals completed:   {} / {}", dash.goals_completed, dash.goals_total);

    println!("\nSubjects");
    for subject in &dash.subjects {
        println!("  {:<20} {}", subject.name, format_hours_minutes(subject.total_time_studied));
    }

    println!("\nUp next");
    if dash.upcoming.is_empty() {
        println!("  nothing scheduled");
    }
    for event in &dash.upcoming {
        println!("  {:<4} {:<20} {}", event.day, event.time_label(), event.title);
    }
    Ok(())
}
