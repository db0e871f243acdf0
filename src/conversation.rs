//! Inbound conversation request and the outbound payload built from it

use crate::remote::{RemoteInput, RemoteMessage};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A chat turn submitted by the caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationRequest {
    pub input: String,
    /// Prior turns as `[role, content]` pairs
    #[serde(default)]
    pub chat_history: Vec<(String, String)>,
    #[serde(default)]
    pub file: Option<FileAttachment>,
}

/// Attached file, forwarded unchanged to the execution service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub base64: String,
    pub extension: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Input must not be empty")]
    EmptyInput,
    #[error("Attachment is not valid base64: {0}")]
    InvalidAttachment(String),
    #[error("Attachment extension must not be empty")]
    MissingExtension,
}

impl ConversationRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            chat_history: Vec::new(),
            file: None,
        }
    }

    #[cfg(test)]
    pub fn with_turn(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.chat_history.push((role.into(), content.into()));
        self
    }

    #[cfg(test)]
    pub fn with_file(mut self, file: FileAttachment) -> Self {
        self.file = Some(file);
        self
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.input.trim().is_empty() {
            return Err(RequestError::EmptyInput);
        }
        if let Some(file) = &self.file {
            if file.extension.trim().is_empty() {
                return Err(RequestError::MissingExtension);
            }
            STANDARD
                .decode(file.base64.as_bytes())
                .map_err(|e| RequestError::InvalidAttachment(e.to_string()))?;
        }
        Ok(())
    }

    /// Prior turns mapped role -> type, then the new human turn last
    pub fn to_remote_input(&self) -> RemoteInput {
        let mut input: Vec<RemoteMessage> = self
            .chat_history
            .iter()
            .map(|(role, content)| RemoteMessage::new(role.as_str(), content.as_str()))
            .collect();
        input.push(RemoteMessage::human(self.input.as_str()));

        RemoteInput {
            input,
            file: self.file.clone(),
        }
    }
}
