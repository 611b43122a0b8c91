use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "capystudy", version, about = "CapyStudy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Study subjects and their accumulated time
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Schedule events and study goals
    Planner {
        #[command(subcommand)]
        action: commands::planner::PlannerAction,
    },
    /// Notes and folders
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Daily wellness logs
    Wellness {
        #[command(subcommand)]
        action: commands::wellness::WellnessAction,
    },
    /// Ask Capy a study question (interactive chat without a question)
    Ask(commands::ask::AskArgs),
    /// Profile and settings
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Log in with an email address or phone number
    Login(commands::profile::LoginArgs),
    /// Log out
    Logout,
    /// Study overview
    Dashboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = capystudy_core::Config::load_or_default();
    common::init_logging(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Planner { action } => commands::planner::run(action),
        Commands::Notes { action } => commands::notes::run(action),
        Commands::Wellness { action } => commands::wellness::run(action, &config),
        Commands::Ask(args) => commands::ask::run(args, &config),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Login(args) => commands::profile::login(args),
        Commands::Logout => commands::profile::logout(),
        Commands::Dashboard { json } => commands::dashboard::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "capystudy", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
