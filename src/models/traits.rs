use async_trait::async_trait;

use super::types::{CompletionRequest, FragmentStream};
use crate::utils::CoachError;

/// Core trait that every completion backend must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one conversation to the model and get its reply as ordered text fragments.
    ///
    /// Errors returned here happen before any fragment exists; failures
    /// after that arrive as `Err` items inside the stream.
    async fn stream(&self, request: CompletionRequest) -> Result<FragmentStream, CoachError>;
}
