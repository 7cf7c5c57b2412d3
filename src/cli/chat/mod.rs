//! Chat command - interactive session on stdin/stdout

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::domain::DomainError;
use crate::infrastructure::services::ChatService;

const HELP: &str = "Commands: /temp <0.1-1.0>, /clear, /quit";

/// A line typed by the user
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Prompt(&'a str),
    Temperature(f32),
    Clear,
    Quit,
    Invalid(&'static str),
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();

    if line.is_empty() {
        return Input::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return Input::Prompt(line);
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "exit"), None) => Input::Quit,
        (Some("clear"), None) => Input::Clear,
        (Some("temp"), Some(value)) => match value.parse::<f32>() {
            Ok(temperature) if temperature.is_finite() => Input::Temperature(temperature),
            _ => Input::Invalid("Usage: /temp <0.1-1.0>"),
        },
        (Some("temp"), None) => Input::Invalid("Usage: /temp <0.1-1.0>"),
        _ => Input::Invalid(HELP),
    }
}

/// Run the interactive session until `/quit` or end of input
pub async fn run() -> anyhow::Result<()> {
    let service = super::bootstrap().await?;

    println!("Local chat. {}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Invalid(message) => println!("{}", message),
            Input::Clear => {
                service.clear_cache().await;
                println!("Cache cleared.");
            }
            Input::Temperature(value) => {
                let applied = service.set_temperature(value).await;
                println!("Temperature set to {:.1}", applied);
            }
            Input::Prompt(prompt) => answer(&service, prompt).await,
        }
    }

    println!("Goodbye.");
    Ok(())
}

async fn answer(service: &ChatService, prompt: &str) {
    print!("Assistant: ");
    let _ = std::io::stdout().flush();

    let result = service
        .send(prompt, |delta| {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        })
        .await;

    match result {
        Ok(reply) if reply.from_cache => println!("\n(cached)"),
        Ok(_) => println!(),
        Err(DomainError::RateLimited { message }) => println!("{}", message),
        Err(e) => {
            error!("Chat request failed: {}", e);
            println!("\nError: {}", e);
        }
    }
}
