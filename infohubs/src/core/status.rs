//! Resolution state and strategy kind enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single hub entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// Never requested, or the last attempt failed.
    Unresolved,
    /// Its strategy or factory is running.
    Resolving,
    /// Cached; the value never changes again.
    Resolved,
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self::Unresolved
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// How the resolver hub obtains an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Named component adapter.
    Adapter,
    /// Tool fetched by name from the environment.
    Tool,
    /// Caller-provided factory called with the context only.
    ContextFactory,
    /// Restricted traversal to a required view.
    View,
    /// Restricted, non-fatal traversal to a browser view.
    Browser,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adapter => write!(f, "adapter"),
            Self::Tool => write!(f, "tool"),
            Self::ContextFactory => write!(f, "context_factory"),
            Self::View => write!(f, "view"),
            Self::Browser => write!(f, "browser"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(ResolutionState::default().to_string(), "unresolved");
        assert_eq!(ResolutionState::Resolving.to_string(), "resolving");
    }

    #[test]
    fn test_strategy_kind_serde() {
        let json = serde_json::to_string(&StrategyKind::ContextFactory).unwrap();
        assert_eq!(json, "\"context_factory\"");
    }
}
