//! CLI module for Local Chat
//!
//! Provides subcommands:
//! - `chat`: interactive session (default)
//! - `ask`: answer a single prompt
//! - `clear`: empty the semantic cache

pub mod ask;
pub mod chat;
pub mod clear;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::services::ChatService;

/// Local Chat - talk to a local Ollama model with a semantic response cache
#[derive(Parser)]
#[command(name = "local-chat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start an interactive chat session (default)
    Chat,

    /// Answer a single prompt and exit
    Ask(ask::AskArgs),

    /// Remove every cached answer
    Clear,
}

/// Load configuration, install logging and build the chat service
pub async fn bootstrap() -> anyhow::Result<ChatService> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    Ok(crate::create_chat_service(&config).await?)
}
