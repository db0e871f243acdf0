//! Event handlers
//!
//! Each handler is a pure function of the turn state and one event. All
//! handlers see every event, in the fixed order of [`HANDLERS`].

use super::state::{ToolSlot, TurnState};
use super::Effect;
use crate::events::PipelineEvent;
use crate::ui::{component, resolve};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Unknown tool type: {0}")]
    UnknownToolType(String),
    #[error("Tool call without a type")]
    MissingToolType,
}

pub type Handler = fn(&mut TurnState, &PipelineEvent) -> Result<Vec<Effect>, ReconcileError>;

/// Handlers in evaluation order
pub const HANDLERS: [(&str, Handler); 3] = [
    ("tool_invocation", tool_invocation),
    ("tool_result", tool_result),
    ("chat_stream", chat_stream),
];

/// Shows the loading view for the first tool call of the turn.
///
/// Only the first entry of `tool_calls` is considered, and only the first
/// such event binds the slot.
fn tool_invocation(state: &mut TurnState, event: &PipelineEvent) -> Result<Vec<Effect>, ReconcileError> {
    let PipelineEvent::ModelInvocationEnd {
        run_id,
        tool_call: Some(call),
    } = event
    else {
        return Ok(vec![]);
    };

    if state.tool_slot.is_bound() {
        tracing::debug!(run_id = %run_id, tool_type = %call.tool_type, "Tool slot already bound, ignoring tool call");
        return Ok(vec![]);
    }

    match resolve(&call.tool_type) {
        Some((tool, tool_component)) => {
            state.tool_slot = ToolSlot::Pending { tool };
            Ok(vec![Effect::ShowToolLoading {
                tool,
                view: (tool_component.loading)(Some(&call.args)),
            }])
        }
        None => {
            state.tool_slot = ToolSlot::Failed {
                tool_type: call.tool_type.clone(),
            };
            if call.tool_type.is_empty() {
                Err(ReconcileError::MissingToolType)
            } else {
                Err(ReconcileError::UnknownToolType(call.tool_type.clone()))
            }
        }
    }
}

/// Finalizes a pending tool placeholder with the tool's result
fn tool_result(state: &mut TurnState, event: &PipelineEvent) -> Result<Vec<Effect>, ReconcileError> {
    let PipelineEvent::ToolExecutionEnd {
        run_id,
        tool_result,
    } = event
    else {
        return Ok(vec![]);
    };

    match &state.tool_slot {
        ToolSlot::Pending { tool } => {
            let tool = *tool;
            state.tool_slot = ToolSlot::Done { tool };
            Ok(vec![Effect::FinalizeTool {
                view: (component(tool).final_view)(Some(tool_result)),
            }])
        }
        ToolSlot::Done { tool } => {
            tracing::debug!(run_id = %run_id, tool = %tool, "Tool already finalized, dropping result");
            Ok(vec![])
        }
        ToolSlot::Failed { tool_type } => {
            tracing::debug!(run_id = %run_id, tool_type = %tool_type, "Dropping result for unknown tool");
            Ok(vec![])
        }
        ToolSlot::Unbound => {
            tracing::warn!(run_id = %run_id, "Tool result without a prior tool call, dropping");
            Ok(vec![])
        }
    }
}

/// Streams chat tokens into one message buffer per run id
fn chat_stream(state: &mut TurnState, event: &PipelineEvent) -> Result<Vec<Effect>, ReconcileError> {
    let PipelineEvent::ChatModelChunk { run_id, content } = event else {
        return Ok(vec![]);
    };

    let mut effects = Vec::new();
    if !state.has_stream(run_id) {
        state.streams.push(run_id.clone());
        effects.push(Effect::OpenMessage {
            run_id: run_id.clone(),
        });
    }
    if !content.is_empty() {
        effects.push(Effect::AppendText {
            run_id: run_id.clone(),
            delta: content.clone(),
        });
    }
    Ok(effects)
}

/// Reconciliation of one turn
#[derive(Debug, Default)]
pub struct Reconciler {
    state: TurnState,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Run every handler against `event`. A failing handler becomes an
    /// error placeholder and does not stop the others.
    pub fn handle(&mut self, event: &PipelineEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        for (name, handler) in HANDLERS {
            match handler(&mut self.state, event) {
                Ok(produced) => effects.extend(produced),
                Err(e) => {
                    tracing::warn!(handler = name, event = event.label(), error = %e, "Handler failed");
                    effects.push(Effect::error(e.to_string()));
                }
            }
        }
        effects
    }

    /// Close the open text streams once the event source is exhausted.
    /// A pending tool placeholder is left loading.
    pub fn finish(&mut self) -> Vec<Effect> {
        self.state
            .streams
            .iter()
            .map(|run_id| Effect::CloseMessage {
                run_id: run_id.clone(),
            })
            .collect()
    }
}
