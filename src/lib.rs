pub mod app;
pub mod cli;
pub mod constants;
pub mod export;
pub mod models;
pub mod runtime;
pub mod session;
pub mod utils;

pub use app::{load_config, Config};
pub use export::{sanitize, save_transcript};
pub use models::{AnthropicClient, ChatMessage, CompletionClient, MessageRole, SessionConfig};
pub use session::Coach;
pub use utils::CoachError;
