//! View descriptors rendered by the client

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Component used for streamed assistant messages
pub const MESSAGE_COMPONENT: &str = "ai-message";
/// Component used for turn-level failures
pub const ERROR_COMPONENT: &str = "error";

/// A component key plus the props it is rendered with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub component: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub props: Value,
}

impl View {
    pub fn new(component: impl Into<String>, props: Option<&Value>) -> Self {
        Self {
            component: component.into(),
            props: props.cloned().unwrap_or(Value::Null),
        }
    }

    pub fn message() -> Self {
        Self::new(MESSAGE_COMPONENT, None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            component: ERROR_COMPONENT.to_string(),
            props: json!({ "message": message.into() }),
        }
    }
}
