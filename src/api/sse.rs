//! Server-Sent Events support

use crate::runtime::SseEvent;
use crate::ui::{PlaceholderKind, UiUpdate};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

/// Convert a turn's event channel to an SSE stream
pub fn sse_stream(
    rx: mpsc::UnboundedReceiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = UnboundedReceiverStream::new(rx).map(|event| Ok(sse_event_to_axum(event)));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event_to_axum(event: SseEvent) -> Event {
    let (event_type, data) = sse_event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn sse_event_payload(event: SseEvent) -> (&'static str, serde_json::Value) {
    match event {
        SseEvent::Update(UiUpdate::PlaceholderCreated { id, kind, view }) => {
            let mut data = json!({
                "id": id,
                "kind": &kind,
                "view": view
            });
            if let PlaceholderKind::Message { run_id } = &kind {
                data["run_id"] = json!(run_id);
            }
            ("placeholder_created", data)
        }
        SseEvent::Update(UiUpdate::TextAppended { id, delta }) => (
            "text_appended",
            json!({
                "id": id,
                "delta": delta
            }),
        ),
        SseEvent::Update(UiUpdate::PlaceholderFinalized { id, view }) => (
            "placeholder_finalized",
            json!({
                "id": id,
                "view": view
            }),
        ),
        SseEvent::TurnDone {
            outcome,
            placeholders,
        } => (
            "turn_done",
            json!({
                "outcome": outcome,
                "placeholders": placeholders
            }),
        ),
        SseEvent::Error { message } => (
            "error",
            json!({
                "message": message
            }),
        ),
    }
}
