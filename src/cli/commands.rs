use anyhow::Result;
use colored::Colorize;

use crate::app::init_config;

use super::Commands;

/// Handle CLI subcommands
///
/// Returns `true` when the command was fully handled and the program should exit.
pub fn handle_command(command: &Commands) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing MyCoach configuration...");
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display().to_string().green());
            println!("Set `model` there (or export MYCOACH_MODEL) before chatting.");
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to the interactive session
    }
}

/// Show version information
pub fn show_version() {
    println!("MyCoach v{}", env!("CARGO_PKG_VERSION"));
    println!("   A supportive personal coach in your terminal");
}
