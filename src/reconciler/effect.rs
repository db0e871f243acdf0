//! Effects produced by the handlers and their application to a sink

use crate::runtime::RenderSink;
use crate::ui::{PlaceholderId, PlaceholderKind, ToolKind, View};
use std::collections::HashMap;

/// Rendering effects, applied in order after each event
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create the turn's tool placeholder with its loading view
    ShowToolLoading { tool: ToolKind, view: View },

    /// Move the tool placeholder to its final view
    FinalizeTool { view: View },

    /// Create an error placeholder
    ShowError { view: View },

    /// Create the message placeholder for a text stream
    OpenMessage { run_id: String },

    /// Append streamed text
    AppendText { run_id: String, delta: String },

    /// Mark a text stream complete
    CloseMessage { run_id: String },
}

impl Effect {
    pub fn error(message: impl Into<String>) -> Self {
        Effect::ShowError {
            view: View::error(message),
        }
    }
}

/// Maps reconciler-level identities (the tool slot, run ids) to placeholder handles
#[derive(Debug, Default)]
pub struct SinkBinding {
    tool: Option<PlaceholderId>,
    messages: HashMap<String, PlaceholderId>,
}

impl SinkBinding {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn tool_placeholder(&self) -> Option<PlaceholderId> {
        self.tool
    }

    #[cfg(test)]
    pub fn message_placeholder(&self, run_id: &str) -> Option<PlaceholderId> {
        self.messages.get(run_id).copied()
    }

    pub fn apply_all<K: RenderSink>(&mut self, effects: Vec<Effect>, sink: &mut K) {
        for effect in effects {
            self.apply(effect, sink);
        }
    }

    pub fn apply<K: RenderSink>(&mut self, effect: Effect, sink: &mut K) {
        match effect {
            Effect::ShowToolLoading { tool, view } => {
                if self.tool.is_some() {
                    tracing::warn!(tool = %tool, "Tool placeholder already exists");
                    return;
                }
                self.tool = Some(sink.create_placeholder(PlaceholderKind::Tool { tool }, view));
            }
            Effect::FinalizeTool { view } => match self.tool {
                Some(id) => {
                    sink.finalize(id, view);
                }
                None => tracing::warn!("No tool placeholder to finalize"),
            },
            Effect::ShowError { view } => {
                sink.create_placeholder(PlaceholderKind::Error, view);
            }
            Effect::OpenMessage { run_id } => {
                if self.messages.contains_key(&run_id) {
                    return;
                }
                let id = sink.create_placeholder(
                    PlaceholderKind::Message {
                        run_id: run_id.clone(),
                    },
                    View::message(),
                );
                self.messages.insert(run_id, id);
            }
            Effect::AppendText { run_id, delta } => match self.messages.get(&run_id) {
                Some(&id) => {
                    sink.append_text(id, &delta);
                }
                None => tracing::warn!(run_id = %run_id, "Text for unopened stream"),
            },
            Effect::CloseMessage { run_id } => {
                if let Some(&id) = self.messages.get(&run_id) {
                    sink.finalize(id, View::message());
                }
            }
        }
    }
}
