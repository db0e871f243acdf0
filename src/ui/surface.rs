//! UI surface: the ordered placeholders created during one turn

use super::{ToolKind, View};
use crate::runtime::RenderSink;
use serde::Serialize;

/// Handle of a placeholder, sequential in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlaceholderId(pub u32);

impl std::fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a placeholder stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaceholderKind {
    Tool { tool: ToolKind },
    Message { run_id: String },
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStatus {
    Pending,
    Done,
}

/// A placeholder and its last observed state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub id: PlaceholderId,
    pub kind: PlaceholderKind,
    pub status: PlaceholderStatus,
    pub view: View,
    /// Accumulated text of a message placeholder
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl Placeholder {
    pub fn is_done(&self) -> bool {
        self.status == PlaceholderStatus::Done
    }
}

/// Incremental change to the surface, as forwarded to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiUpdate {
    PlaceholderCreated {
        id: PlaceholderId,
        kind: PlaceholderKind,
        view: View,
    },
    TextAppended {
        id: PlaceholderId,
        delta: String,
    },
    PlaceholderFinalized {
        id: PlaceholderId,
        view: View,
    },
}

/// In-memory surface; every placeholder moves pending -> done at most once
#[derive(Debug, Default)]
pub struct UiSurface {
    placeholders: Vec<Placeholder>,
}

impl UiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn into_placeholders(self) -> Vec<Placeholder> {
        self.placeholders
    }

    #[cfg(test)]
    pub fn get(&self, id: PlaceholderId) -> Option<&Placeholder> {
        self.placeholders.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: PlaceholderId) -> Option<&mut Placeholder> {
        self.placeholders.get_mut(id.0 as usize)
    }

    #[cfg(test)]
    pub fn tool_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(|p| matches!(p.kind, PlaceholderKind::Tool { .. }))
    }

    #[cfg(test)]
    pub fn message_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(|p| matches!(p.kind, PlaceholderKind::Message { .. }))
    }
}

impl RenderSink for UiSurface {
    fn create_placeholder(&mut self, kind: PlaceholderKind, view: View) -> PlaceholderId {
        let id = PlaceholderId(u32::try_from(self.placeholders.len()).unwrap_or(u32::MAX));
        self.placeholders.push(Placeholder {
            id,
            kind,
            status: PlaceholderStatus::Pending,
            view,
            text: String::new(),
        });
        id
    }

    fn append_text(&mut self, id: PlaceholderId, delta: &str) -> bool {
        match self.get_mut(id) {
            Some(placeholder) if !placeholder.is_done() => {
                placeholder.text.push_str(delta);
                true
            }
            Some(_) => {
                tracing::debug!(placeholder = %id, "Ignoring text for finalized placeholder");
                false
            }
            None => {
                tracing::warn!(placeholder = %id, "Text for unknown placeholder");
                false
            }
        }
    }

    fn finalize(&mut self, id: PlaceholderId, view: View) -> bool {
        match self.get_mut(id) {
            Some(placeholder) if !placeholder.is_done() => {
                placeholder.status = PlaceholderStatus::Done;
                placeholder.view = view;
                true
            }
            Some(_) => {
                tracing::debug!(placeholder = %id, "Placeholder already finalized");
                false
            }
            None => {
                tracing::warn!(placeholder = %id, "Finalize for unknown placeholder");
                false
            }
        }
    }

    fn snapshot(&self) -> Vec<Placeholder> {
        self.placeholders.clone()
    }
}
