// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod anthropic;
mod sse;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use anthropic::AnthropicClient;
pub use traits::CompletionClient;
#[cfg(test)]
pub use traits::MockCompletionClient;
pub use types::{
    ChatMessage, CompletionRequest, FragmentStream, MessageRole, SessionConfig, StreamCallback,
};
