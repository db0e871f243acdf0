//! Remote execution service access
//!
//! Opens the pipeline's event stream and decodes it into [`StreamEvent`]s.

mod client;
mod error;
mod types;

#[allow(unused_imports)] // Public API re-exports
pub use client::{decode_event_stream, RemoteRunnableClient};
#[allow(unused_imports)]
pub use error::{RemoteError, RemoteErrorKind};
#[allow(unused_imports)]
pub use types::{EventData, RemoteInput, RemoteMessage, StreamEvent};

use crate::runtime::EventSource;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Ordered event stream of one pipeline run
pub type EventStream = BoxStream<'static, Result<StreamEvent, RemoteError>>;

/// Logging wrapper for event sources
pub struct LoggingSource {
    inner: Arc<dyn EventSource>,
    target: String,
}

impl LoggingSource {
    pub fn new(inner: Arc<dyn EventSource>, target: impl Into<String>) -> Self {
        Self {
            inner,
            target: target.into(),
        }
    }
}

#[async_trait]
impl EventSource for LoggingSource {
    async fn open(&self, input: &RemoteInput) -> Result<EventStream, RemoteError> {
        let start = std::time::Instant::now();
        let result = self.inner.open(input).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    target_url = %self.target,
                    duration_ms = %duration.as_millis(),
                    messages = input.input.len(),
                    has_file = input.file.is_some(),
                    "Event stream opened"
                );
            }
            Err(e) => {
                tracing::error!(
                    target_url = %self.target,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    status = ?e.status_code,
                    "Failed to open event stream"
                );
            }
        }

        result
    }
}
