use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::constants::{QUIT_COMMAND, RESET_COMMAND};
use crate::export::save_transcript;
use crate::models::StreamCallback;
use crate::session::Coach;

/// What a line of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session and save the transcript
    Quit,
    /// Clear the conversation
    Reset,
    /// Send the text to the coach
    Chat(String),
    /// Blank input
    Skip,
}

/// Interpret one line of input
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Command::Skip
    } else if trimmed.eq_ignore_ascii_case(QUIT_COMMAND) {
        Command::Quit
    } else if trimmed.eq_ignore_ascii_case(RESET_COMMAND) {
        Command::Reset
    } else {
        Command::Chat(trimmed.to_string())
    }
}

/// Interactive read-eval-print loop around a [`Coach`]
pub struct Repl {
    coach: Coach,
    transcript_path: Option<PathBuf>,
}

impl Repl {
    pub fn new(coach: Coach, transcript_path: Option<PathBuf>) -> Self {
        Self {
            coach,
            transcript_path,
        }
    }

    /// Run against the process stdin
    pub async fn run(self) -> Result<Coach> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Run against any line source. Returns the session once the user quits.
    pub async fn run_with<R>(self, input: R) -> Result<Coach>
    where
        R: AsyncBufRead + Unpin,
    {
        println!("MyCoach — type 'quit' to exit, 'reset' to start over.\n");

        let mut lines = input.lines();
        loop {
            print!("{} ", "You:".bold().cyan());
            std::io::stdout().flush()?;

            // End of input behaves like `quit`
            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                println!();
                break;
            };

            match parse_command(&line) {
                Command::Skip => continue,
                Command::Quit => break,
                Command::Reset => {
                    self.coach.reset().await;
                    println!("Conversation reset.\n");
                }
                Command::Chat(text) => self.turn(&text).await?,
            }
        }

        if let Some(path) = &self.transcript_path {
            let history = self.coach.history().await;
            save_transcript(&history, path)
                .with_context(|| format!("Failed to save transcript to {}", path.display()))?;
            println!("Conversation saved to {}", path.display());
        }

        Ok(self.coach)
    }

    async fn turn(&self, text: &str) -> Result<()> {
        print!("{} ", "Coach:".bold().green());
        std::io::stdout().flush()?;

        let echo: StreamCallback = Arc::new(|fragment: &str| {
            print!("{}", fragment);
            if let Err(e) = std::io::stdout().flush() {
                debug!("failed to flush reply fragment: {}", e);
            }
        });

        match self.coach.chat(text, Some(echo)).await {
            Ok(reply) => {
                debug!(chars = reply.len(), "reply printed");
                println!("\n");
            }
            Err(e) => {
                // A failed turn is reported and the loop keeps going
                println!();
                eprintln!("{} {}\n", "Error:".red().bold(), e);
            }
        }
        Ok(())
    }
}
