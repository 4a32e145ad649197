use std::path::Path;
use tracing::info;

use super::sanitize::sanitize;
use crate::constants::{ASSISTANT_LABEL, TRANSCRIPT_RULE_WIDTH, TRANSCRIPT_TITLE, USER_LABEL};
use crate::models::{ChatMessage, MessageRole};
use crate::utils::CoachError;

/// Render a conversation as the plain-text transcript format
pub fn render_transcript(history: &[ChatMessage]) -> String {
    let mut out = String::new();
    out.push_str(TRANSCRIPT_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(TRANSCRIPT_RULE_WIDTH));
    out.push_str("\n\n");

    for message in history {
        let label = match message.role() {
            MessageRole::User => USER_LABEL,
            MessageRole::Assistant => ASSISTANT_LABEL,
        };
        out.push_str(&format!("{}: {}\n\n", label, sanitize(message.content())));
    }

    out
}

/// Write the transcript to `path`, replacing any existing file
pub fn save_transcript(history: &[ChatMessage], path: &Path) -> Result<(), CoachError> {
    std::fs::write(path, render_transcript(history))?;
    info!(messages = history.len(), path = %path.display(), "transcript saved");
    Ok(())
}
