use anyhow::Result;
use clap::Parser;

use mycoach::{
    app::{load_config, load_config_file},
    cli::{handle_command, Cli},
    models::AnthropicClient,
    runtime::Repl,
    session::Coach,
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Handle subcommands
    if let Some(command) = &cli.command {
        if handle_command(command)? {
            return Ok(());
        }
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => load_config()?,
    };

    let session_config = config.session_config(cli.model.clone(), cli.max_tokens)?;
    let client = AnthropicClient::from_config(&config.anthropic)?;
    let coach = Coach::new(Box::new(client), session_config);

    let transcript_path = if cli.no_transcript {
        None
    } else {
        Some(cli.transcript.clone().unwrap_or_else(|| config.transcript_path()))
    };

    Repl::new(coach, transcript_path).run().await?;
    Ok(())
}
