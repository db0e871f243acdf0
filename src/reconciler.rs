//! Event reconciler
//!
//! Pure handlers turn decoded pipeline events into [`Effect`]s against the
//! turn's [`TurnState`]; [`SinkBinding`] applies those effects to a
//! [`RenderSink`](crate::runtime::RenderSink).

mod effect;
mod handlers;
pub mod state;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, SinkBinding};
#[allow(unused_imports)] // Public API re-exports
pub use handlers::{ReconcileError, Reconciler, HANDLERS};
#[allow(unused_imports)]
pub use state::{ToolSlot, TurnState};
