use thiserror::Error;

/// Main error type for MyCoach
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoachError {
    /// Whether the failure came from talking to the completion service
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CoachError::Network(_) | CoachError::Api { .. } | CoachError::Stream(_)
        )
    }
}
