use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::sse::{ApiErrorResponse, SseDecoder};
use super::traits::CompletionClient;
use super::types::{ChatMessage, CompletionRequest, FragmentStream};
use crate::app::AnthropicConfig;
use crate::constants::{ANTHROPIC_API_VERSION, HTTP_REQUEST_TIMEOUT_SECS};
use crate::utils::CoachError;

/// Completion client for the Anthropic Messages API
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    /// Create a new client with an explicit key and endpoint
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, CoachError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client whose key is read once from the configured environment variable
    pub fn from_config(config: &AnthropicConfig) -> Result<Self, CoachError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CoachError::Config(format!(
                    "{} is not set. Export your API key before starting MyCoach.",
                    config.api_key_env
                ))
            })?;

        Self::new(api_key, config.base_url.clone())
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    system: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

impl<'a> From<&'a CompletionRequest> for MessagesRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: &request.messages,
            stream: true,
        }
    }
}

/// Pull a readable message out of an error response body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn stream(&self, request: CompletionRequest) -> Result<FragmentStream, CoachError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&MessagesRequest::from(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoachError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.bytes_stream().boxed();
        let fragments = stream::unfold(
            (body, SseDecoder::new(), false),
            |(mut body, mut decoder, done)| async move {
                if done {
                    return None;
                }
                let items = match body.next().await {
                    Some(Ok(bytes)) => decoder.feed(&bytes),
                    Some(Err(e)) => {
                        return Some((vec![Err(CoachError::from(e))], (body, decoder, true)))
                    }
                    // Body closed: anything short of message_stop is a cut-off reply
                    None => return Some((decoder.finish(), (body, decoder, true))),
                };
                let done = decoder.is_finished();
                Some((items, (body, decoder, done)))
            },
        )
        .flat_map(stream::iter);

        Ok(fragments.boxed())
    }
}
