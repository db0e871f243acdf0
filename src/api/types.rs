//! API request and response types

use crate::runtime::TurnOutcome;
use crate::ui::{Placeholder, ToolKind};
use serde::Serialize;

/// Response for a non-streaming agent turn
#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub outcome: TurnOutcome,
    pub placeholders: Vec<Placeholder>,
}

/// A registered tool and the components it renders with
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub tool: ToolKind,
    pub loading: String,
    #[serde(rename = "final")]
    pub final_view: String,
}

/// Response for tool list
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
