//! HTTP API for the relay

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{EventSource, TurnRuntime};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<TurnRuntime<Arc<dyn EventSource>>>,
}

impl AppState {
    pub fn new(runtime: TurnRuntime<Arc<dyn EventSource>>) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}
