//! Trait abstractions for runtime I/O
//!
//! These traits let the turn runtime run against mock sources and sinks.

use crate::remote::{EventStream, RemoteError, RemoteInput};
use crate::ui::{Placeholder, PlaceholderId, PlaceholderKind, View};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens the ordered event stream of one pipeline run
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn open(&self, input: &RemoteInput) -> Result<EventStream, RemoteError>;
}

/// Receiver of placeholder updates for one turn
pub trait RenderSink: Send {
    /// Create a pending placeholder and return its handle
    fn create_placeholder(&mut self, kind: PlaceholderKind, view: View) -> PlaceholderId;

    /// Append text to a pending placeholder. Returns false if nothing changed.
    fn append_text(&mut self, id: PlaceholderId, delta: &str) -> bool;

    /// Move a placeholder to its final view. Returns false if it was already done.
    fn finalize(&mut self, id: PlaceholderId, view: View) -> bool;

    /// Whether the client behind this sink has gone away
    fn is_closed(&self) -> bool {
        false
    }

    /// Current placeholders in creation order
    fn snapshot(&self) -> Vec<Placeholder>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: EventSource + ?Sized> EventSource for Arc<T> {
    async fn open(&self, input: &RemoteInput) -> Result<EventStream, RemoteError> {
        (**self).open(input).await
    }
}
