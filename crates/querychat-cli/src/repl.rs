//! Interactive loop: one line of input per query or command.

use querychat_client::{ChatSession, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Clear,
    Limit,
    Dismiss,
    History,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/clear" => Command::Clear,
            "/limit" => Command::Limit,
            "/dismiss" => Command::Dismiss,
            "/history" => Command::History,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Ask(line.to_string()),
        }
    }
}

pub async fn run(session: &ChatSession) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(render::banner(session).as_bytes()).await?;
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match Command::parse(&line) {
            Command::Quit => break,
            Command::Ask(query) => match session.submit(&query).await {
                SubmitOutcome::Completed(reply) => render::reply(&reply, &session.state()),
                SubmitOutcome::Rejected => render::session_error(&session.state()),
                SubmitOutcome::Busy => "Hay una consulta en curso.\n".to_string(),
            },
            Command::Clear => {
                session.clear_history();
                "Historial borrado.\n".to_string()
            }
            Command::Limit => render::rate_limit(&session.rate_limit_info()),
            Command::Dismiss => {
                session.dismiss_cold_start_warning();
                session.dismiss_rate_limit_warning();
                String::new()
            }
            Command::History => render::history(&session.messages()),
            Command::Help => render::help(),
        };
        stdout.write_all(output.as_bytes()).await?;
    }
    Ok(())
}
