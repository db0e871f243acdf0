//! Per-turn reconciliation state

use crate::ui::ToolKind;

/// The single tool slot of a turn. Once bound it never returns to `Unbound`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolSlot {
    #[default]
    Unbound,
    /// Loading view shown, waiting for the tool result
    Pending { tool: ToolKind },
    /// Final view shown
    Done { tool: ToolKind },
    /// First tool call named a type with no registered component
    Failed { tool_type: String },
}

impl ToolSlot {
    pub fn is_bound(&self) -> bool {
        !matches!(self, ToolSlot::Unbound)
    }
}

/// State owned by one reconciliation; never shared between turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    pub tool_slot: ToolSlot,
    /// Run ids with an open text buffer, in first-seen order
    pub streams: Vec<String>,
}

impl TurnState {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_stream(&self, run_id: &str) -> bool {
        self.streams.iter().any(|id| id == run_id)
    }
}
