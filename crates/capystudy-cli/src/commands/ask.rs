use std::io::Write;

use capystudy_core::{ChatSession, Config, StudyAssistant};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::common::{block_on, CliResult};

#[derive(Args)]
pub struct AskArgs {
    /// The question; starts a chat when omitted
    question: Option<String>,
    /// Subject or topic the question is about
    #[arg(long)]
    context: Option<String>,
}

pub fn run(args: AskArgs, config: &Config) -> CliResult {
    let assistant = StudyAssistant::from_config(&config.assistant)?;
    match args.question {
        Some(question) => {
            let answer = block_on(async {
                assistant
                    .get_study_help(&question, args.context.as_deref())
                    .await
            })?;
            println!("{answer}");
        }
        None => block_on(chat(assistant))??,
    }
    Ok(())
}

async fn chat(assistant: StudyAssistant) -> CliResult {
    let mut session = ChatSession::new();
    for message in session.messages() {
        println!("capy> {}", message.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        if let Some(reply) = session.send(&assistant, &line).await {
            println!("capy> {}", reply.text);
        }
    }
    Ok(())
}
