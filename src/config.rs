//! Relay configuration from environment variables

use crate::events::{NodeNames, MODEL_INVOCATION_NODE, TOOL_EXECUTION_NODE};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REMOTE_URL: &str = "http://localhost:8000/chat";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
    #[error("Model and tool node names must differ (both are {0:?})")]
    NodeCollision(String),
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Mount point of the remote runnable
    pub remote_url: String,
    pub port: u16,
    pub nodes: NodeNames,
    /// Bounded wait per event; `None` waits indefinitely
    pub event_idle_timeout: Option<Duration>,
    /// Overall timeout of one remote request
    pub request_timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let remote_url = non_empty(&lookup, "RELAY_REMOTE_URL", DEFAULT_REMOTE_URL)?;
        let model_invocation = non_empty(&lookup, "RELAY_MODEL_NODE", MODEL_INVOCATION_NODE)?;
        let tool_execution = non_empty(&lookup, "RELAY_TOOL_NODE", TOOL_EXECUTION_NODE)?;
        if model_invocation == tool_execution {
            return Err(ConfigError::NodeCollision(model_invocation));
        }

        let port = match lookup("RELAY_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "RELAY_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let event_idle_timeout = seconds(&lookup, "RELAY_EVENT_IDLE_TIMEOUT_SECS")?;
        let request_timeout = seconds(&lookup, "RELAY_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Ok(Self {
            remote_url,
            port,
            nodes: NodeNames {
                model_invocation,
                tool_execution,
            },
            event_idle_timeout,
            request_timeout,
        })
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(var) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(value) => Ok(value.trim().to_string()),
        None => Ok(default.to_string()),
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.clone(),
        })?;
    if secs == 0 {
        return Err(ConfigError::Zero { var });
    }
    Ok(Some(Duration::from_secs(secs)))
}
