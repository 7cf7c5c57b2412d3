//! Ask command - answers one prompt and exits

use std::io::Write;

use clap::Args;

/// Arguments for the ask command
#[derive(Args, Clone)]
pub struct AskArgs {
    /// Prompt to send
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,
}

/// Run a single question
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let service = super::bootstrap().await?;
    let prompt = args.prompt.join(" ");

    let reply = service
        .send(&prompt, |delta| {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        })
        .await?;

    println!();
    if reply.from_cache {
        eprintln!("(answered from cache)");
    }

    Ok(())
}
