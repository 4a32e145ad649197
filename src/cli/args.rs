use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mycoach")]
#[command(version)]
#[command(about = "A supportive personal coach in your terminal", long_about = None)]
pub struct Cli {
    /// Model identifier sent to the API (overrides config)
    #[arg(short, long, env = "MYCOACH_MODEL")]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum tokens to generate per reply
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Where to save the transcript on quit
    #[arg(long, conflicts_with = "no_transcript")]
    pub transcript: Option<PathBuf>,

    /// Don't write a transcript on quit
    #[arg(long)]
    pub no_transcript: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start a coaching session (default)
    Chat,
    /// Show version information
    Version,
}
