//! Typed pipeline events, decoded once at ingestion

use crate::remote::StreamEvent;
use serde_json::Value;

/// Default identifier of the model-invocation node
pub const MODEL_INVOCATION_NODE: &str = "invoke_model";
/// Default identifier of the tool-execution node
pub const TOOL_EXECUTION_NODE: &str = "invoke_tools";
/// Tag of token-stream events from a chat model
pub const CHAT_MODEL_STREAM: &str = "on_chat_model_stream";

/// Lifecycle phase carried in an event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Stream,
    End,
}

/// Split an `on_<kind>_<phase>` tag into kind and phase
pub fn parse_tag(tag: &str) -> Option<(&str, Phase)> {
    let rest = tag.strip_prefix("on_")?;
    let (kind, phase) = rest.rsplit_once('_')?;
    if kind.is_empty() {
        return None;
    }
    let phase = match phase {
        "start" => Phase::Start,
        "stream" => Phase::Stream,
        "end" => Phase::End,
        _ => return None,
    };
    Some((kind, phase))
}

/// Pipeline node identifiers the handlers react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeNames {
    pub model_invocation: String,
    pub tool_execution: String,
}

impl Default for NodeNames {
    fn default() -> Self {
        Self {
            model_invocation: MODEL_INVOCATION_NODE.to_string(),
            tool_execution: TOOL_EXECUTION_NODE.to_string(),
        }
    }
}

/// Tool selection requested by a model invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub tool_type: String,
    pub args: Value,
}

/// Stream event after decoding
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Model-invocation node finished; `tool_call` is the first requested tool, if any
    ModelInvocationEnd {
        run_id: String,
        tool_call: Option<ToolCallRequest>,
    },
    /// Tool-execution node finished
    ToolExecutionEnd { run_id: String, tool_result: Value },
    /// Incremental token output from a chat model
    ChatModelChunk { run_id: String, content: String },
    /// Anything the handlers do not act on, including malformed events
    Unrecognized { event: String, name: String },
}

impl PipelineEvent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ModelInvocationEnd { .. } => "model_invocation_end",
            Self::ToolExecutionEnd { .. } => "tool_execution_end",
            Self::ChatModelChunk { .. } => "chat_model_chunk",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Decode a wire event. Never fails: anything unexpected is `Unrecognized`.
pub fn decode(raw: StreamEvent, nodes: &NodeNames) -> PipelineEvent {
    let StreamEvent {
        event,
        name,
        run_id,
        data,
    } = raw;

    if event == CHAT_MODEL_STREAM {
        return match data.chunk {
            Some(Value::Object(chunk)) => {
                let content = chunk
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                PipelineEvent::ChatModelChunk { run_id, content }
            }
            _ => PipelineEvent::Unrecognized { event, name },
        };
    }

    let is_end = matches!(parse_tag(&event), Some((_, Phase::End)));
    let output = match data.output {
        Some(Value::Object(output)) if is_end => output,
        _ => return PipelineEvent::Unrecognized { event, name },
    };

    if name == nodes.model_invocation {
        let tool_call = output
            .get("tool_calls")
            .and_then(Value::as_array)
            .and_then(|calls| calls.first())
            .map(|first| {
                let call = decode_tool_call(first);
                if call.tool_type.is_empty() {
                    tracing::warn!(run_id = %run_id, call = %first, "Tool call without a type");
                }
                call
            });
        PipelineEvent::ModelInvocationEnd { run_id, tool_call }
    } else if name == nodes.tool_execution {
        let tool_result = output.get("tool_result").cloned().unwrap_or(Value::Null);
        PipelineEvent::ToolExecutionEnd {
            run_id,
            tool_result,
        }
    } else {
        PipelineEvent::Unrecognized { event, name }
    }
}

/// A call without a string `type` keeps an empty type so it still claims the turn's tool slot
fn decode_tool_call(call: &Value) -> ToolCallRequest {
    ToolCallRequest {
        tool_type: call
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        args: call.get("args").cloned().unwrap_or(Value::Null),
    }
}
