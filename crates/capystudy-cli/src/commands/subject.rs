use capystudy_core::dashboard::format_hours_minutes;
use capystudy_core::StudyDesk;
use clap::Subcommand;

use crate::common::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// List subjects with their studied time
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a subject
    Add {
        name: String,
        /// Hex color like #3b82f6
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a subject (the last one cannot be deleted)
    Delete { id: String },
}

pub fn run(action: SubjectAction) -> CliResult {
    let mut desk = StudyDesk::open(open_store()?);

    match action {
        SubjectAction::List { json } => {
            if json {
                return print_json(&desk.subjects().list());
            }
            for subject in desk.subjects().list() {
                println!(
                    "{:<36}  {:<20} {}  {}",
                    subject.id,
                    subject.name,
                    subject.color,
                    format_hours_minutes(subject.total_time_studied)
                );
            }
        }
        SubjectAction::Add { name, color } => {
            let subject = desk.add_subject(&name, color.as_deref())?;
            println!("Subject created: {} ({})", subject.name, subject.id);
        }
        SubjectAction::Delete { id } => {
            if desk.delete_subject(&id) {
                println!("Subject deleted: {id}");
            } else {
                return Err(format!("cannot delete subject '{id}' (unknown, or the last one)").into());
            }
        }
    }
    Ok(())
}
