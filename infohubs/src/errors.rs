//! Error types for the infohubs caches.
//!
//! Soft misses (missing browsers, unknown UIDs) are not errors; they resolve
//! to [`Value::None`](crate::core::Value::None). Everything in here
//! propagates to the caller and leaves the requested name unresolved, so the
//! next access retries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for hub operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// A strategy or factory precondition was violated.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A strategy table entry uses the paired `(tool, method)` form.
    #[error("hub[{name:?}]: paired strategy ({tool}, {method}) is not supported")]
    UnsupportedStrategy {
        /// The requested name.
        name: String,
        /// The tool part of the pair.
        tool: String,
        /// The method part of the pair.
        method: String,
    },

    /// The derived hub has no factory for the requested name.
    #[error("No factory registered for '{name}'")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// A required environment lookup (tool, adapter or view) failed.
    #[error("{kind} lookup failed for '{name}': {source}")]
    Lookup {
        /// The strategy kind ("tool", "adapter", "view").
        kind: &'static str,
        /// The looked up name.
        name: String,
        /// The underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// Resolution of a name re-entered itself.
    #[error("{0}")]
    CircularDependency(#[from] CircularDependencyError),

    /// A resolved value does not have the requested shape.
    #[error("Value for '{name}' is not {expected}")]
    TypeMismatch {
        /// The requested name.
        name: String,
        /// Description of the expected shape.
        expected: String,
    },

    /// A size table line could not be parsed.
    #[error("Malformed size line {line:?}: {reason}")]
    SizeParse {
        /// The offending line.
        line: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An external collaborator failed.
    #[error("Collaborator error in '{name}': {source}")]
    Collaborator {
        /// The name being resolved when the collaborator failed.
        name: String,
        /// The underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// Configuration could not be loaded.
    #[error("Invalid hub configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Wraps a collaborator failure.
    #[must_use]
    pub fn collaborator(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Collaborator {
            name: name.into(),
            source,
        }
    }

    /// Returns a short, stable identifier for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::UnsupportedStrategy { .. } => "unsupported_strategy",
            Self::NotFound { .. } => "not_found",
            Self::Lookup { .. } => "lookup",
            Self::CircularDependency(_) => "circular_dependency",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::SizeParse { .. } => "size_parse",
            Self::Collaborator { .. } => "collaborator",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));

        match self {
            Self::NotFound { name }
            | Self::Lookup { name, .. }
            | Self::TypeMismatch { name, .. }
            | Self::Collaborator { name, .. }
            | Self::UnsupportedStrategy { name, .. } => {
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::CircularDependency(err) => {
                map.insert("chain".to_string(), serde_json::json!(err.chain));
                map.insert("code".to_string(), serde_json::json!(err.error_info.code));
            }
            _ => {}
        }

        map
    }
}

/// Metadata about an error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "HUB-001-CYCLE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Error raised when a factory (indirectly) requests the name it is
/// currently producing.
#[derive(Debug, Clone, Error)]
#[error("Circular dependency between hub entries: {}", chain.join(" -> "))]
pub struct CircularDependencyError {
    /// The resolution chain, ending with the re-entered name.
    pub chain: Vec<String>,
    /// Diagnostic info.
    pub error_info: ErrorInfo,
}

impl CircularDependencyError {
    /// Creates a new circular dependency error.
    #[must_use]
    pub fn new(chain: Vec<String>) -> Self {
        let info = ErrorInfo::new(
            "HUB-001-CYCLE",
            format!("Factories depend on each other: {}", chain.join(" -> ")),
        )
        .with_fix_hint("Remove one of the reads in the cycle from its factory.");

        Self {
            chain,
            error_info: info,
        }
    }
}
