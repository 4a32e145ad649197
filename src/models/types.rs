use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::utils::CoachError;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single conversation entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Immutable per-session model parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    system_prompt: String,
    model: String,
    max_tokens: usize,
}

impl SessionConfig {
    pub fn new(
        system_prompt: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

/// Everything the completion service needs for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: usize,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Build a request from the session parameters and the current history
    pub fn new(config: &SessionConfig, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: config.model().to_string(),
            max_tokens: config.max_tokens(),
            system: config.system_prompt().to_string(),
            messages,
        }
    }
}

/// Ordered text fragments of one reply
pub type FragmentStream = BoxStream<'static, Result<String, CoachError>>;

/// Stream callback type for real-time response streaming
pub type StreamCallback = Arc<dyn Fn(&str) + Send + Sync>;
