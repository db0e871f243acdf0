//! Wire types exchanged with the execution service

use crate::conversation::FileAttachment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single conversation record in the outbound payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl RemoteMessage {
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new("human", content)
    }
}

/// Runnable input: prior turns followed by the new human turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteInput {
    pub input: Vec<RemoteMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileAttachment>,
}

/// Body of a `stream_events` call
#[derive(Debug, Serialize)]
pub struct StreamEventsRequest<'a> {
    pub input: &'a RemoteInput,
    pub config: Value,
    pub kwargs: Value,
}

impl<'a> StreamEventsRequest<'a> {
    pub fn new(input: &'a RemoteInput) -> Self {
        Self {
            input,
            config: json!({}),
            kwargs: json!({}),
        }
    }
}

/// Lifecycle event as emitted by the running pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub event: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub data: EventData,
}

/// Variant payload of a stream event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<Value>,
}

impl StreamEvent {
    #[cfg(test)]
    pub fn new(event: impl Into<String>, name: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            name: name.into(),
            run_id: run_id.into(),
            data: EventData::default(),
        }
    }

    #[cfg(test)]
    pub fn with_output(mut self, output: Value) -> Self {
        self.data.output = Some(output);
        self
    }

    #[cfg(test)]
    pub fn with_chunk(mut self, chunk: Value) -> Self {
        self.data.chunk = Some(chunk);
        self
    }
}

/// Payload of an `error` frame
#[derive(Debug, Deserialize)]
pub struct ErrorFrame {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}
