use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::{
    ChatMessage, CompletionClient, CompletionRequest, SessionConfig, StreamCallback,
};
use crate::utils::CoachError;

/// A single linear conversation with the completion service.
///
/// The history lock is held for the whole turn, so concurrent `chat` calls
/// on a shared `Coach` run one after another instead of interleaving.
pub struct Coach {
    client: Box<dyn CompletionClient>,
    config: SessionConfig,
    history: Mutex<Vec<ChatMessage>>,
}

impl Coach {
    /// Create a new session with an empty history
    pub fn new(client: Box<dyn CompletionClient>, config: SessionConfig) -> Self {
        Self {
            client,
            config,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send a message and collect the streamed reply.
    ///
    /// Each fragment is handed to `on_fragment` as soon as it arrives. If the
    /// service fails, the user message stays in history and no assistant
    /// message is recorded.
    pub async fn chat(
        &self,
        user_text: &str,
        on_fragment: Option<StreamCallback>,
    ) -> Result<String, CoachError> {
        let mut history = self.history.lock().await;
        history.push(ChatMessage::user(user_text));

        let request = CompletionRequest::new(&self.config, history.clone());
        debug!(turn = history.len() / 2 + 1, "starting turn");

        let mut stream = self.client.stream(request).await.inspect_err(|e| {
            warn!("completion request failed: {}", e);
        })?;

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment.inspect_err(|e| {
                warn!(received = reply.len(), "reply stream failed: {}", e);
            })?;
            if let Some(callback) = &on_fragment {
                callback(&fragment);
            }
            reply.push_str(&fragment);
        }

        history.push(ChatMessage::assistant(reply.clone()));
        debug!(chars = reply.len(), "turn complete");
        Ok(reply)
    }

    /// Snapshot of the conversation so far
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    /// Forget the conversation. Configuration is kept.
    pub async fn reset(&self) {
        let mut history = self.history.lock().await;
        info!(cleared = history.len(), "conversation reset");
        history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SYSTEM_PROMPT;
    use crate::models::{FragmentStream, MessageRole, MockCompletionClient};
    use futures::stream;
    use std::sync::{Arc, Mutex as StdMutex};

    fn fragments(chunks: &[&str]) -> FragmentStream {
        let items: Vec<Result<String, CoachError>> =
            chunks.iter().map(|c| Ok(c.to_string())).collect();
        stream::iter(items).boxed()
    }

    fn config() -> SessionConfig {
        SessionConfig::new(DEFAULT_SYSTEM_PROMPT, "test-model", 1024)
    }

    /// Mock that replays the given replies in order and records every request
    fn scripted(
        replies: Vec<Vec<&'static str>>,
    ) -> (MockCompletionClient, Arc<StdMutex<Vec<CompletionRequest>>>) {
        let requests = Arc::new(StdMutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let mut replies = replies.into_iter();

        let mut client = MockCompletionClient::new();
        client.expect_stream().returning(move |request| {
            seen.lock().unwrap().push(request);
            let chunks = replies.next().expect("unexpected extra request");
            Ok(fragments(&chunks))
        });
        (client, requests)
    }

    #[tokio::test]
    async fn test_returns_response_text() {
        let (client, _) = scripted(vec![vec!["Great", " goal", "!"]]);
        let coach = Coach::new(Box::new(client), config());

        let result = coach.chat("I want to run a marathon.", None).await.unwrap();
        assert_eq!(result, "Great goal!");
    }

    #[tokio::test]
    async fn test_appends_user_then_assistant() {
        let (client, _) = scripted(vec![vec!["That's a great goal!"]]);
        let coach = Coach::new(Box::new(client), config());

        coach.chat("Help me set a goal.", None).await.unwrap();
        assert_eq!(
            coach.history().await,
            vec![
                ChatMessage::user("Help me set a goal."),
                ChatMessage::assistant("That's a great goal!"),
            ]
        );
    }

    #[tokio::test]
    async fn test_history_alternates_across_turns() {
        let (client, _) = scripted(vec![vec!["one"], vec!["two"], vec!["three"]]);
        let coach = Coach::new(Box::new(client), config());

        for text in ["a", "b", "c"] {
            coach.chat(text, None).await.unwrap();
        }

        let history = coach.history().await;
        assert_eq!(history.len(), 6);
        for (i, message) in history.iter().enumerate() {
            let expected = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            assert_eq!(message.role(), expected);
        }
    }

    #[tokio::test]
    async fn test_passes_full_history_to_api() {
        let (client, requests) = scripted(vec![vec!["First."], vec!["Second."], vec!["Third."]]);
        let coach = Coach::new(Box::new(client), config());

        coach.chat("Turn 1", None).await.unwrap();
        coach.chat("Turn 2", None).await.unwrap();
        coach.chat("Turn 3", None).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(
            requests[2].messages,
            vec![
                ChatMessage::user("Turn 1"),
                ChatMessage::assistant("First."),
                ChatMessage::user("Turn 2"),
                ChatMessage::assistant("Second."),
                ChatMessage::user("Turn 3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_uses_session_config() {
        let (client, requests) = scripted(vec![vec!["Hi!"]]);
        let coach = Coach::new(
            Box::new(client),
            SessionConfig::new("Be concise.", "custom-model", 256),
        );

        coach.chat("Hello", None).await.unwrap();

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "custom-model");
        assert_eq!(request.system, "Be concise.");
        assert_eq!(request.max_tokens, 256);
    }

    #[tokio::test]
    async fn test_empty_response() {
        let (client, _) = scripted(vec![vec![]]);
        let coach = Coach::new(Box::new(client), config());

        let result = coach.chat("Hello", None).await.unwrap();
        assert_eq!(result, "");
        assert_eq!(coach.history().await[1], ChatMessage::assistant(""));
    }

    #[tokio::test]
    async fn test_fragments_forwarded_in_order() {
        let (client, _) = scripted(vec![vec!["a", "b", "c"]]);
        let coach = Coach::new(Box::new(client), config());

        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: StreamCallback = Arc::new(move |fragment: &str| {
            sink.lock().unwrap().push(fragment.to_string());
        });

        let result = coach.chat("Go", Some(callback)).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(result, "abc");
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let (client, _) = scripted(vec![vec!["Before"], vec!["After reset"]]);
        let coach = Coach::new(Box::new(client), config());

        coach.chat("Before reset", None).await.unwrap();
        assert_eq!(coach.history().await.len(), 2);

        coach.reset().await;
        assert!(coach.history().await.is_empty());
        assert_eq!(coach.config().model(), "test-model");

        let result = coach.chat("Fresh start", None).await.unwrap();
        assert_eq!(result, "After reset");
        assert_eq!(coach.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_on_empty_session() {
        let coach = Coach::new(Box::new(MockCompletionClient::new()), config());
        coach.reset().await;
        assert!(coach.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_returns_copy() {
        let (client, _) = scripted(vec![vec!["Hi!"]]);
        let coach = Coach::new(Box::new(client), config());
        coach.chat("Hello", None).await.unwrap();

        let mut history = coach.history().await;
        history.clear();
        assert_eq!(coach.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_request_keeps_user_message() {
        let mut client = MockCompletionClient::new();
        client
            .expect_stream()
            .times(1)
            .returning(|_| Err(CoachError::Stream("connection refused".to_string())));
        let coach = Coach::new(Box::new(client), config());

        let err = coach.chat("Anyone there?", None).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(coach.history().await, vec![ChatMessage::user("Anyone there?")]);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_discards_partial_reply() {
        let mut client = MockCompletionClient::new();
        client.expect_stream().returning(|_| {
            let items: Vec<Result<String, CoachError>> = vec![
                Ok("partial".to_string()),
                Err(CoachError::Api {
                    status: 529,
                    message: "Overloaded".to_string(),
                }),
            ];
            Ok(stream::iter(items).boxed())
        });
        let coach = Coach::new(Box::new(client), config());

        let seen = Arc::new(StdMutex::new(String::new()));
        let sink = Arc::clone(&seen);
        let callback: StreamCallback = Arc::new(move |fragment: &str| {
            sink.lock().unwrap().push_str(fragment);
        });

        let err = coach.chat("Hi", Some(callback)).await.unwrap_err();
        assert!(matches!(err, CoachError::Api { status: 529, .. }));
        assert_eq!(*seen.lock().unwrap(), "partial");
        assert_eq!(coach.history().await, vec![ChatMessage::user("Hi")]);
    }

    #[tokio::test]
    async fn test_concurrent_chats_do_not_interleave() {
        let mut client = MockCompletionClient::new();
        client.expect_stream().times(2).returning(|request| {
            let last = request.messages.last().unwrap().content().to_string();
            let items: Vec<Result<String, CoachError>> =
                vec![Ok("re: ".to_string()), Ok(last)];
            // Yield between fragments so the other task gets a chance to run
            Ok(stream::iter(items)
                .then(|item| async move {
                    tokio::task::yield_now().await;
                    item
                })
                .boxed())
        });
        let coach = Arc::new(Coach::new(Box::new(client), config()));

        let first = tokio::spawn({
            let coach = Arc::clone(&coach);
            async move { coach.chat("one", None).await }
        });
        let second = tokio::spawn({
            let coach = Arc::clone(&coach);
            async move { coach.chat("two", None).await }
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let history = coach.history().await;
        assert_eq!(history.len(), 4);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role(), MessageRole::User);
            assert_eq!(pair[1].role(), MessageRole::Assistant);
            assert_eq!(pair[1].content(), format!("re: {}", pair[0].content()));
        }
    }
}
