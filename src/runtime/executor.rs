//! Turn runtime executor

use super::traits::{EventSource, RenderSink};
use crate::conversation::ConversationRequest;
use crate::events::{decode, NodeNames};
use crate::reconciler::{Reconciler, SinkBinding};
use crate::remote::{EventStream, RemoteError, StreamEvent};
use futures::StreamExt;
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Event source exhausted
    Completed,
    /// Caller cancelled or the client went away
    Cancelled,
    /// No event arrived within the idle timeout
    TimedOut,
}

impl TurnOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnOutcome::Completed => "completed",
            TurnOutcome::Cancelled => "cancelled",
            TurnOutcome::TimedOut => "timed_out",
        }
    }
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

enum Next {
    Event(StreamEvent),
    End,
    Idle,
    Failed(RemoteError),
}

impl From<Option<Result<StreamEvent, RemoteError>>> for Next {
    fn from(item: Option<Result<StreamEvent, RemoteError>>) -> Self {
        match item {
            Some(Ok(event)) => Next::Event(event),
            Some(Err(e)) => Next::Failed(e),
            None => Next::End,
        }
    }
}

/// Runs turns against an event source. Holds no per-turn state, so one
/// instance serves any number of concurrent turns.
pub struct TurnRuntime<E: EventSource> {
    source: E,
    nodes: NodeNames,
    idle_timeout: Option<Duration>,
}

impl<E: EventSource> TurnRuntime<E> {
    pub fn new(source: E, nodes: NodeNames) -> Self {
        Self {
            source,
            nodes,
            idle_timeout: None,
        }
    }

    /// Bound the wait for each event; `None` waits indefinitely
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Run one turn, rendering into `sink`.
    ///
    /// On cancellation or timeout every placeholder is left as last observed.
    /// A transport failure is returned as an error; placeholders created
    /// before it stay in the sink.
    pub async fn run<K: RenderSink>(
        &self,
        request: &ConversationRequest,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        let turn_id = Uuid::new_v4();
        let start = Instant::now();
        tracing::info!(
            turn_id = %turn_id,
            history = request.chat_history.len(),
            has_file = request.file.is_some(),
            "Starting turn"
        );

        let input = request.to_remote_input();
        let mut stream = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!(turn_id = %turn_id, "Turn cancelled before stream opened");
                return Ok(TurnOutcome::Cancelled);
            }
            opened = self.source.open(&input) => opened?,
        };

        let mut reconciler = Reconciler::new();
        let mut binding = SinkBinding::new();
        let mut events = 0usize;

        let outcome = loop {
            if sink.is_closed() {
                break TurnOutcome::Cancelled;
            }

            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => break TurnOutcome::Cancelled,
                next = self.next_event(&mut stream) => next,
            };

            match next {
                Next::Event(raw) => {
                    let event = decode(raw, &self.nodes);
                    events += 1;
                    tracing::trace!(turn_id = %turn_id, event = event.label(), "Reconciling event");
                    binding.apply_all(reconciler.handle(&event), sink);
                }
                Next::End => {
                    binding.apply_all(reconciler.finish(), sink);
                    break TurnOutcome::Completed;
                }
                Next::Idle => {
                    tracing::warn!(
                        turn_id = %turn_id,
                        timeout_secs = self.idle_timeout.map(|t| t.as_secs()),
                        "No event within idle timeout"
                    );
                    break TurnOutcome::TimedOut;
                }
                Next::Failed(e) => {
                    tracing::error!(
                        turn_id = %turn_id,
                        events,
                        error = %e,
                        kind = e.kind.as_str(),
                        "Event stream failed"
                    );
                    return Err(e.into());
                }
            }
        };

        tracing::info!(
            turn_id = %turn_id,
            outcome = outcome.as_str(),
            events,
            duration_ms = %start.elapsed().as_millis(),
            "Turn finished"
        );
        Ok(outcome)
    }

    async fn next_event(&self, stream: &mut EventStream) -> Next {
        match self.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                Ok(item) => item.into(),
                Err(_) => Next::Idle,
            },
            None => stream.next().await.into(),
        }
    }
}
