/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 600; // 10 minutes for long replies

// Default Model Configuration
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// Instruction sent as the system prompt when none is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a supportive personal coach. You help users:
- Set and achieve meaningful goals
- Overcome obstacles and limiting beliefs
- Build positive habits and routines
- Reflect on progress and celebrate wins

Ask clarifying questions to understand the user's situation deeply.
Be encouraging, honest, and action-oriented.";

// Transcript
pub const TRANSCRIPT_FILE_NAME: &str = "mycoach_conversation.txt";
pub const TRANSCRIPT_TITLE: &str = "MyCoach Conversation";
pub const TRANSCRIPT_RULE_WIDTH: usize = 40;
pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "Coach";

// Interactive commands
pub const QUIT_COMMAND: &str = "quit";
pub const RESET_COMMAND: &str = "reset";
