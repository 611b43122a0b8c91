use std::io::Write;
use std::ops::ControlFlow;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use capystudy_core::audio::{AmbientMixer, AudioChannel, SilentBackend};
use capystudy_core::events::Event;
use capystudy_core::timer::{format_clock, Ticker};
use capystudy_core::{Config, StudyDesk, TimerEngine, TimerMode};
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crate::common::{block_on, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer interactively (reads commands from stdin)
    Run {
        /// Subject to credit focus sessions to
        #[arg(long)]
        subject: Option<String>,
        /// Start counting down immediately
        #[arg(long)]
        start: bool,
    },
    /// Set focus/break durations in minutes
    Config {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long = "break")]
        brk: Option<u32>,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction, config: &Config) -> CliResult {
    let store = open_store()?;
    let mut desk = StudyDesk::open_with(store, &config.timer);

    match action {
        TimerAction::Run { subject, start } => {
            if let Some(id) = subject {
                desk.select_subject(&id)?;
            }
            block_on(run_session(desk, config.clone(), start))??;
        }
        TimerAction::Config { focus, brk } => {
            desk.set_durations(focus, brk)?;
            print_json(&desk.snapshot())?;
        }
        TimerAction::Status => print_json(&desk.snapshot())?,
    }
    Ok(())
}

/// One line of interactive input.
#[derive(Debug, PartialEq)]
enum Input {
    Start,
    Pause,
    Toggle,
    Reset,
    Mode(TimerMode),
    Focus(u32),
    Break(u32),
    Subject(String),
    Level(AudioChannel, f32),
    Status,
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();
        let minutes = || {
            arg.and_then(|a| a.parse::<u32>().ok())
                .ok_or_else(|| format!("usage: {cmd} <minutes>"))
        };
        let level = || {
            arg.and_then(|a| a.parse::<f32>().ok())
                .map(|percent| percent / 100.0)
                .ok_or_else(|| format!("usage: {cmd} <0-100>"))
        };

        match cmd.as_str() {
            "start" | "s" => Ok(Input::Start),
            "pause" | "p" => Ok(Input::Pause),
            "" | "toggle" | "t" => Ok(Input::Toggle),
            "reset" | "r" => Ok(Input::Reset),
            "focus" | "f" => match arg {
                None => Ok(Input::Mode(TimerMode::Focus)),
                Some(_) => minutes().map(Input::Focus),
            },
            "rest" | "break" | "b" => match arg {
                None => Ok(Input::Mode(TimerMode::ShortBreak)),
                Some(_) => minutes().map(Input::Break),
            },
            "subject" => arg
                .map(|id| Input::Subject(id.to_string()))
                .ok_or_else(|| "usage: subject <id>".to_string()),
            "lofi" => level().map(|l| Input::Level(AudioChannel::Lofi, l)),
            "noise" => level().map(|l| Input::Level(AudioChannel::WhiteNoise, l)),
            "status" => Ok(Input::Status),
            "help" | "?" => Ok(Input::Help),
            "quit" | "q" | "exit" => Ok(Input::Quit),
            other => Err(format!("unknown command '{other}' (type 'help')")),
        }
    }
}

const HELP: &str = "\
commands:
  start | pause | <enter> toggle | reset
  focus [minutes]    switch to focus, or set its duration
  rest [minutes]     switch to rest, or set its duration
  subject <id>       credit sessions to another subject
  lofi <0-100>       lo-fi music level
  noise <0-100>      rain noise level
  status | help | quit";

async fn run_session(desk: StudyDesk, config: Config, autostart: bool) -> CliResult {
    let desk = Arc::new(Mutex::new(desk));
    let period = Duration::from_millis(config.timer.tick_interval_ms.max(1));
    let mut ticker = Ticker::new();
    let mut mixer = AmbientMixer::new(SilentBackend::default(), &config.audio);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::debug!(period_ms = period.as_millis() as u64, "interactive timer session");

    println!("{HELP}");
    render(desk.lock().await.engine());
    if autostart {
        dispatch(Input::Start, &desk, &mut ticker, &mut mixer, period).await;
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(input) => dispatch(input, &desk, &mut ticker, &mut mixer, period).await,
                    Err(message) => println!("{message}"),
                }
            }
        }
    }

    ticker.cancel();
    mixer.stop_all();
    println!();
    Ok(())
}

async fn dispatch(
    input: Input,
    desk: &Arc<Mutex<StudyDesk>>,
    ticker: &mut Ticker,
    mixer: &mut AmbientMixer<SilentBackend>,
    period: Duration,
) {
    let mut guard = desk.lock().await;
    let outcome: Result<Option<Event>, String> = match input {
        Input::Start => Ok(guard.start()),
        Input::Pause => Ok(guard.pause()),
        Input::Toggle => Ok(guard.toggle()),
        Input::Reset => Ok(guard.reset()),
        Input::Mode(mode) => match guard.switch_mode(mode) {
            Some(event) => Ok(Some(event)),
            None => Err("pause the timer before switching mode".into()),
        },
        Input::Focus(minutes) => guard.set_focus_minutes(minutes).map(Some).map_err(|e| e.to_string()),
        Input::Break(minutes) => guard.set_break_minutes(minutes).map(Some).map_err(|e| e.to_string()),
        Input::Subject(id) => guard.select_subject(&id).map(|_| None).map_err(|e| e.to_string()),
        Input::Level(channel, level) => {
            mixer.set_level(channel, level);
            Ok(None)
        }
        Input::Status => Ok(Some(guard.snapshot())),
        Input::Help => {
            println!("{HELP}");
            Ok(None)
        }
        Input::Quit => Ok(None),
    };

    match outcome {
        Ok(Some(snapshot @ Event::StateSnapshot { .. })) => {
            if let Ok(json) = serde_json::to_string_pretty(&snapshot) {
                println!("\n{json}");
            }
        }
        Ok(Some(Event::TimerStarted { .. })) => {
            render(guard.engine());
            drop(guard);
            start_ticker(desk, ticker, period);
            return;
        }
        Ok(Some(Event::TimerPaused { .. })) | Ok(Some(Event::TimerReset { .. })) => ticker.cancel(),
        Ok(_) => {}
        Err(message) => println!("\n{message}"),
    }
    render(guard.engine());
}

fn start_ticker(desk: &Arc<Mutex<StudyDesk>>, ticker: &mut Ticker, period: Duration) {
    let desk = Arc::clone(desk);
    ticker.start(period, move || {
        let desk = Arc::clone(&desk);
        async move {
            let mut desk = desk.lock().await;
            let completed = desk.tick();
            if let Some(event) = completed {
                announce(&event);
                render(desk.engine());
                return ControlFlow::Break(());
            }
            render(desk.engine());
            if desk.engine().is_running() {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        }
    });
}

fn announce(event: &Event) {
    match event {
        Event::FocusSessionCompleted { subject_id, minutes, .. } => {
            println!("\n\u{7}Focus session complete: {minutes} min credited to subject {subject_id}");
        }
        Event::TimerCompleted { mode, .. } => println!("\n\u{7}{} finished", mode.label()),
        _ => {}
    }
}

fn render(engine: &TimerEngine) {
    let state = if engine.is_running() { "running" } else { "paused" };
    print!(
        "\r{:<5} {} [{:>3.0}%] {:<7}",
        engine.mode().label(),
        format_clock(engine.seconds_remaining()),
        engine.progress() * 100.0,
        state
    );
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("".parse::<Input>(), Ok(Input::Toggle));
        assert_eq!("START".parse::<Input>(), Ok(Input::Start));
        assert_eq!("focus".parse::<Input>(), Ok(Input::Mode(TimerMode::Focus)));
        assert_eq!("focus 40".parse::<Input>(), Ok(Input::Focus(40)));
        assert_eq!("rest".parse::<Input>(), Ok(Input::Mode(TimerMode::ShortBreak)));
        assert_eq!("rest 10".parse::<Input>(), Ok(Input::Break(10)));
        assert_eq!("lofi 50".parse::<Input>(), Ok(Input::Level(AudioChannel::Lofi, 0.5)));
        assert_eq!("subject 2".parse::<Input>(), Ok(Input::Subject("2".into())));
        assert_eq!("q".parse::<Input>(), Ok(Input::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("focus ten".parse::<Input>().is_err());
        assert!("noise".parse::<Input>().is_err());
        assert!("subject".parse::<Input>().is_err());
        assert!("dance".parse::<Input>().is_err());
    }
}
