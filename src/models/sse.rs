use serde::Deserialize;

use crate::utils::CoachError;

/// Incremental decoder for the Messages API server-sent event stream.
///
/// Network chunks do not respect line boundaries, so partial lines are
/// buffered until their newline arrives. Only text deltas are surfaced.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `message_stop` has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed a raw chunk and collect every fragment completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<String, CoachError>> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.finished {
                continue;
            }
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
            if let Some(item) = self.decode_line(line) {
                out.push(item);
            }
        }
        out
    }

    /// Flush after the body closed. A reply that never reached
    /// `message_stop` was cut off and ends in a stream error.
    pub fn finish(&mut self) -> Vec<Result<String, CoachError>> {
        let mut out = Vec::new();
        if !self.finished && !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            if let Some(item) = self.decode_line(line.trim_end_matches('\r')) {
                out.push(item);
            }
        }
        if !self.finished {
            self.finished = true;
            out.push(Err(CoachError::Stream(
                "stream ended before message_stop".to_string(),
            )));
        }
        out
    }

    fn decode_line(&mut self, line: &str) -> Option<Result<String, CoachError>> {
        // `event:` lines duplicate the JSON `type` field, so only data matters
        let data = line.strip_prefix("data:")?.trim_start();
        if data.is_empty() {
            return None;
        }

        match serde_json::from_str::<StreamEvent>(data) {
            Ok(StreamEvent::ContentBlockDelta {
                delta: Delta::TextDelta { text },
            }) => Some(Ok(text)),
            Ok(StreamEvent::ContentBlockDelta { .. }) => None,
            Ok(StreamEvent::Error { error }) => {
                self.finished = true;
                Some(Err(CoachError::Api {
                    status: error.status_hint(),
                    message: error.message,
                }))
            }
            Ok(StreamEvent::MessageStop) => {
                self.finished = true;
                None
            }
            Ok(StreamEvent::Other) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(CoachError::Stream(format!(
                    "malformed event payload: {}",
                    e
                ))))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta {
        delta: Delta,
    },
    Error {
        error: ApiErrorBody,
    },
    MessageStop,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Error object used both in `error` events and in non-2xx response bodies
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// HTTP status the API documents for this error type
    fn status_hint(&self) -> u16 {
        match self.kind.as_str() {
            "invalid_request_error" => 400,
            "authentication_error" => 401,
            "permission_error" => 403,
            "not_found_error" => 404,
            "rate_limit_error" => 429,
            "overloaded_error" => 529,
            _ => 500,
        }
    }
}

/// Envelope of a non-streaming error response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
