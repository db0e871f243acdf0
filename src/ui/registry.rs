//! Closed registry of tool components
//!
//! Every tool kind maps to a loading/final component pair through an
//! exhaustive match, so a missing entry is a compile error rather than a
//! runtime lookup failure.

use super::View;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Tool types the pipeline may select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    GithubRepo,
    InvoiceParser,
    WeatherData,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::GithubRepo,
        ToolKind::InvoiceParser,
        ToolKind::WeatherData,
    ];

    /// Wire name used in `tool_calls[].type`
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::GithubRepo => "github-repo",
            ToolKind::InvoiceParser => "invoice-parser",
            ToolKind::WeatherData => "weather-data",
        }
    }

    pub fn from_type(tool_type: &str) -> Option<Self> {
        match tool_type {
            "github-repo" => Some(ToolKind::GithubRepo),
            "invoice-parser" => Some(ToolKind::InvoiceParser),
            "weather-data" => Some(ToolKind::WeatherData),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability pair producing a tool's loading and final views
#[derive(Debug, Clone, Copy)]
pub struct ToolComponent {
    pub loading: fn(Option<&Value>) -> View,
    pub final_view: fn(Option<&Value>) -> View,
}

pub fn component(kind: ToolKind) -> ToolComponent {
    match kind {
        ToolKind::GithubRepo => ToolComponent {
            loading: |props| View::new("github-loading", props),
            final_view: |props| View::new("github", props),
        },
        ToolKind::InvoiceParser => ToolComponent {
            loading: |props| View::new("invoice-loading", props),
            final_view: |props| View::new("invoice", props),
        },
        ToolKind::WeatherData => ToolComponent {
            loading: |props| View::new("current-weather-loading", props),
            final_view: |props| View::new("current-weather", props),
        },
    }
}

/// Look up a tool by its wire name
pub fn resolve(tool_type: &str) -> Option<(ToolKind, ToolComponent)> {
    ToolKind::from_type(tool_type).map(|kind| (kind, component(kind)))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool kind {0:?} does not round-trip through its wire name")]
    NameMismatch(ToolKind),
    #[error("Tool kind {0} has an empty component name")]
    EmptyComponent(ToolKind),
    #[error("Tool kind {0} uses the same component for loading and final views")]
    SameComponent(ToolKind),
    #[error("Component {0} is registered more than once")]
    DuplicateComponent(String),
}

/// Startup check over every registered tool kind
pub fn validate_registry() -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for kind in ToolKind::ALL {
        if ToolKind::from_type(kind.as_str()) != Some(kind) {
            return Err(RegistryError::NameMismatch(kind));
        }

        let tool = component(kind);
        let loading = (tool.loading)(None);
        let done = (tool.final_view)(None);
        if loading.component.is_empty() || done.component.is_empty() {
            return Err(RegistryError::EmptyComponent(kind));
        }
        if loading.component == done.component {
            return Err(RegistryError::SameComponent(kind));
        }
        for name in [loading.component, done.component] {
            if !seen.insert(name.clone()) {
                return Err(RegistryError::DuplicateComponent(name));
            }
        }
    }
    Ok(())
}
