//! Runtime for executing agent turns
//!
//! A turn opens the pipeline's event stream, reconciles each event into
//! placeholder updates, and stops on exhaustion, cancellation or timeout.

mod executor;
mod streaming;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{TurnError, TurnOutcome, TurnRuntime};
pub use streaming::StreamingSink;
pub use traits::*;

use crate::ui::{Placeholder, UiUpdate};

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Update(UiUpdate),
    TurnDone {
        outcome: TurnOutcome,
        placeholders: Vec<Placeholder>,
    },
    Error {
        message: String,
    },
}
