//! Render sink that forwards every surface mutation to a client channel

use super::{RenderSink, SseEvent};
use crate::ui::{Placeholder, PlaceholderId, PlaceholderKind, UiSurface, UiUpdate, View};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct StreamingSink {
    surface: UiSurface,
    tx: mpsc::UnboundedSender<SseEvent>,
    closed: bool,
}

impl StreamingSink {
    pub fn new(tx: mpsc::UnboundedSender<SseEvent>) -> Self {
        Self {
            surface: UiSurface::new(),
            tx,
            closed: false,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &UiSurface {
        &self.surface
    }

    /// Cancel `cancel` as soon as the receiving side goes away
    pub fn cancel_on_disconnect(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tx.closed().await;
            tracing::debug!("Client disconnected, cancelling turn");
            cancel.cancel();
        })
    }

    /// Forward an event to the client. Marks the sink closed if nobody is listening.
    pub fn send(&mut self, event: SseEvent) {
        if self.closed {
            return;
        }
        if self.tx.send(event).is_err() {
            tracing::debug!("Client channel closed");
            self.closed = true;
        }
    }
}

impl RenderSink for StreamingSink {
    fn create_placeholder(&mut self, kind: PlaceholderKind, view: View) -> PlaceholderId {
        let id = self.surface.create_placeholder(kind.clone(), view.clone());
        self.send(SseEvent::Update(UiUpdate::PlaceholderCreated { id, kind, view }));
        id
    }

    fn append_text(&mut self, id: PlaceholderId, delta: &str) -> bool {
        let changed = self.surface.append_text(id, delta);
        if changed {
            self.send(SseEvent::Update(UiUpdate::TextAppended {
                id,
                delta: delta.to_string(),
            }));
        }
        changed
    }

    fn finalize(&mut self, id: PlaceholderId, view: View) -> bool {
        let changed = self.surface.finalize(id, view.clone());
        if changed {
            self.send(SseEvent::Update(UiUpdate::PlaceholderFinalized { id, view }));
        }
        changed
    }

    fn is_closed(&self) -> bool {
        self.closed || self.tx.is_closed()
    }

    fn snapshot(&self) -> Vec<Placeholder> {
        self.surface.snapshot()
    }
}
