//! Mock implementations for testing
//!
//! These mocks let the turn runtime and the HTTP layer run without a
//! remote execution service.

use super::traits::*;
use crate::remote::{EventStream, RemoteError, RemoteInput, StreamEvent};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Mutex;

// ============================================================================
// Mock Event Source
// ============================================================================

/// What the stream does after its scripted items run out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Stream ends normally
    Close,
    /// Stream never yields again
    Hang,
}

/// Event source that replays a scripted event sequence on every open
pub struct MockEventSource {
    items: Vec<Result<StreamEvent, RemoteError>>,
    end: StreamEnd,
    open_error: Option<RemoteError>,
    /// Record of all inputs the source was opened with
    pub inputs: Mutex<Vec<RemoteInput>>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            end: StreamEnd::Close,
            open_error: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Source whose `open` fails
    pub fn failing(error: RemoteError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::new()
        }
    }

    pub fn with_event(mut self, event: StreamEvent) -> Self {
        self.items.push(Ok(event));
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = StreamEvent>) -> Self {
        self.items.extend(events.into_iter().map(Ok));
        self
    }

    /// Mid-stream transport failure
    pub fn with_error(mut self, error: RemoteError) -> Self {
        self.items.push(Err(error));
        self
    }

    pub fn hanging(mut self) -> Self {
        self.end = StreamEnd::Hang;
        self
    }

    pub fn recorded_inputs(&self) -> Vec<RemoteInput> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn open(&self, input: &RemoteInput) -> Result<EventStream, RemoteError> {
        self.inputs.lock().unwrap().push(input.clone());
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }

        let scripted = stream::iter(self.items.clone());
        Ok(match self.end {
            StreamEnd::Close => scripted.boxed(),
            StreamEnd::Hang => scripted.chain(stream::pending()).boxed(),
        })
    }
}

// ============================================================================
// Event builders
// ============================================================================

pub fn chat_chunk(run_id: &str, content: &str) -> StreamEvent {
    StreamEvent::new("on_chat_model_stream", "ChatOpenAI", run_id)
        .with_chunk(serde_json::json!({ "content": content }))
}

pub fn tool_call(run_id: &str, tool_type: &str, args: Value) -> StreamEvent {
    StreamEvent::new("on_chain_end", "invoke_model", run_id)
        .with_output(serde_json::json!({ "tool_calls": [{ "type": tool_type, "args": args }] }))
}

pub fn tool_result(run_id: &str, result: Value) -> StreamEvent {
    StreamEvent::new("on_chain_end", "invoke_tools", run_id)
        .with_output(serde_json::json!({ "tool_result": result }))
}
