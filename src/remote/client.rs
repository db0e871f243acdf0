//! HTTP client for a runnable exposed over `stream_events`

use super::types::{ErrorFrame, RemoteInput, StreamEvent, StreamEventsRequest};
use super::{EventStream, RemoteError};
use crate::runtime::EventSource;
use async_trait::async_trait;
use eventsource_stream::{Event as SseFrame, EventStreamError, Eventsource};
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Client for the remote execution service
pub struct RemoteRunnableClient {
    client: Client,
    stream_url: String,
    /// Deadline for connecting and receiving response headers. The body is
    /// not bounded here; the turn runtime owns the per-event wait.
    request_timeout: Duration,
}

impl RemoteRunnableClient {
    /// `base_url` is the runnable's mount point, e.g. `http://localhost:8000/chat`
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| RemoteError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            stream_url: format!("{}/stream_events", base_url.trim_end_matches('/')),
            request_timeout,
        })
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }
}

#[async_trait]
impl EventSource for RemoteRunnableClient {
    async fn open(&self, input: &RemoteInput) -> Result<EventStream, RemoteError> {
        let request = self
            .client
            .post(&self.stream_url)
            .header(ACCEPT, "text/event-stream")
            .json(&StreamEventsRequest::new(input))
            .send();

        let response = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                RemoteError::network(format!(
                    "Request timeout: no response within {}ms",
                    self.request_timeout.as_millis()
                ))
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    RemoteError::network(format!("Connection failed: {e}"))
                } else {
                    RemoteError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| RemoteError::network(format!("Failed to read response: {e}")))?;
            return Err(RemoteError::from_status(status.as_u16(), &body));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| RemoteError::network(format!("Stream interrupted: {e}"))));
        Ok(decode_event_stream(body))
    }
}

/// Turn a raw SSE body into a stream of pipeline events.
///
/// The stream ends at the `end` frame or when the body ends; an `error`
/// frame, a transport failure or a malformed body yields one error and ends
/// the stream.
pub fn decode_event_stream<S, B>(body: S) -> EventStream
where
    S: Stream<Item = Result<B, RemoteError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let frames = body.eventsource().boxed();

    stream::unfold(Some(frames), |frames| async move {
        let mut frames = frames?;
        loop {
            let frame = match frames.next().await? {
                Ok(frame) => frame,
                Err(e) => return Some((Err(frame_error(e)), None)),
            };
            match classify_frame(&frame) {
                FrameOutcome::Event(event) => return Some((Ok(event), Some(frames))),
                FrameOutcome::Skip => {}
                FrameOutcome::End => return None,
                FrameOutcome::Failed(e) => return Some((Err(e), None)),
            }
        }
    })
    .boxed()
}

fn frame_error(error: EventStreamError<RemoteError>) -> RemoteError {
    match error {
        EventStreamError::Transport(e) => e,
        EventStreamError::Utf8(e) => {
            RemoteError::protocol(format!("Event stream is not valid UTF-8: {e}"))
        }
        EventStreamError::Parser(e) => {
            RemoteError::protocol(format!("Malformed event stream: {e}"))
        }
    }
}

enum FrameOutcome {
    Event(StreamEvent),
    Skip,
    End,
    Failed(RemoteError),
}

fn classify_frame(frame: &SseFrame) -> FrameOutcome {
    match frame.event.as_str() {
        "data" => match serde_json::from_str::<StreamEvent>(&frame.data) {
            Ok(event) => FrameOutcome::Event(event),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable stream event");
                FrameOutcome::Skip
            }
        },
        "end" => FrameOutcome::End,
        "error" => {
            let error = match serde_json::from_str::<ErrorFrame>(&frame.data) {
                Ok(ErrorFrame {
                    status_code,
                    message,
                }) => {
                    let err = RemoteError::remote(
                        message.unwrap_or_else(|| "Remote pipeline failed".to_string()),
                    );
                    match status_code {
                        Some(code) => err.with_status(code),
                        None => err,
                    }
                }
                Err(_) => RemoteError::remote(format!("Remote pipeline failed: {}", frame.data)),
            };
            FrameOutcome::Failed(error)
        }
        other => {
            tracing::debug!(event = %other, "Ignoring stream frame");
            FrameOutcome::Skip
        }
    }
}
