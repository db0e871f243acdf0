//! Remote execution service error types

use thiserror::Error;

/// Remote service error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::InvalidRequest, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Remote, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Protocol, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Unknown, message)
    }

    /// Classify a non-success HTTP response from the execution service
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = body.trim();
        let error = match status {
            401 | 403 => Self::auth(format!("Authentication failed: {detail}")),
            400 | 422 => Self::invalid_request(format!("Invalid request: {detail}")),
            500..=599 => Self::server_error(format!("Server error: {detail}")),
            _ => Self::unknown(format!("HTTP {status}: {detail}")),
        };
        error.with_status(status)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Connection failures, timeouts, dropped streams
    Network,
    /// Authentication rejected (401, 403)
    Auth,
    /// Payload rejected by the service (400, 422)
    InvalidRequest,
    /// Server error (5xx)
    ServerError,
    /// The service reported a failure inside the event stream
    Remote,
    /// The response body could not be decoded as an event stream
    Protocol,
    /// Unknown error
    Unknown,
}

impl RemoteErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::InvalidRequest => "invalid_request",
            Self::ServerError => "server_error",
            Self::Remote => "remote",
            Self::Protocol => "protocol",
            Self::Unknown => "unknown",
        }
    }
}
