//! Explicit resolution strategies of the resolver hub.

use crate::config::HubConfig;
use crate::context::Context;
use crate::core::{StrategyKind, Value};
use crate::errors::HubError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A factory that produces a resolver hub entry from the context alone.
pub type ContextFactoryFn = Arc<dyn Fn(&Context) -> Result<Value, HubError> + Send + Sync>;

/// How an explicitly configured name is resolved.
#[derive(Clone)]
pub enum Strategy {
    /// Fetch the named component adapter for the context.
    EnvironmentAdapter,
    /// Fetch a tool by (possibly different) name.
    ToolByName(String),
    /// Call a factory with the context only.
    ContextOnlyFactory(ContextFactoryFn),
    /// A `(tool, method)` pair; always fails with a configuration error.
    Unsupported {
        /// The tool part.
        tool: String,
        /// The method part.
        method: String,
    },
}

impl Strategy {
    /// Creates a context-only factory strategy.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, HubError> + Send + Sync + 'static,
    {
        Self::ContextOnlyFactory(Arc::new(f))
    }

    /// The kind logged for this strategy; `None` for unsupported pairs.
    #[must_use]
    pub fn kind(&self) -> Option<StrategyKind> {
        match self {
            Self::EnvironmentAdapter => Some(StrategyKind::Adapter),
            Self::ToolByName(_) => Some(StrategyKind::Tool),
            Self::ContextOnlyFactory(_) => Some(StrategyKind::ContextFactory),
            Self::Unsupported { .. } => None,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentAdapter => write!(f, "EnvironmentAdapter"),
            Self::ToolByName(tool) => f.debug_tuple("ToolByName").field(tool).finish(),
            Self::ContextOnlyFactory(_) => write!(f, "ContextOnlyFactory(<fn>)"),
            Self::Unsupported { tool, method } => f
                .debug_struct("Unsupported")
                .field("tool", tool)
                .field("method", method)
                .finish(),
        }
    }
}

/// Names looked up as component adapters of the context.
const STANDARD_ADAPTERS: [&str; 4] = ["renderzpt", "securitymanager", "uid2url", "rawbyname"];

/// Immutable name to strategy table, built once and shared by every
/// resolver hub.
#[derive(Debug, Clone, Default)]
pub struct StrategyTable {
    entries: HashMap<String, Strategy>,
}

impl StrategyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the default table: tool aliases, the named adapters, the
    /// `portal` pair, the session data manager and the published template id.
    #[must_use]
    pub fn standard(config: &HubConfig) -> Self {
        let mut table = Self::new();
        for (alias, tool) in &config.tool_aliases {
            table = table.with_strategy(alias.clone(), Strategy::ToolByName(tool.clone()));
        }
        for adapter in STANDARD_ADAPTERS {
            table = table.with_adapter(adapter);
        }

        table
            .with_strategy(
                "portal",
                Strategy::Unsupported {
                    tool: "portal_url".to_string(),
                    method: "getPortalObject".to_string(),
                },
            )
            .with_strategy(
                "session_data_manager",
                Strategy::ToolByName("session_data_manager".to_string()),
            )
            .with_factory("templateid", |context| {
                Ok(Value::from(context.request().published_template.clone()))
            })
    }

    /// Adds or replaces a strategy.
    #[must_use]
    pub fn with_strategy(mut self, name: impl Into<String>, strategy: Strategy) -> Self {
        self.entries.insert(name.into(), strategy);
        self
    }

    /// Adds a context-only factory.
    #[must_use]
    pub fn with_factory<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, HubError> + Send + Sync + 'static,
    {
        self.with_strategy(name, Strategy::factory(f))
    }

    /// Marks `name` as a named component adapter.
    #[must_use]
    pub fn with_adapter(self, name: impl Into<String>) -> Self {
        self.with_strategy(name, Strategy::EnvironmentAdapter)
    }

    /// Gets the strategy for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Strategy> {
        self.entries.get(name)
    }

    /// Returns true if the name is configured explicitly.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of configured names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tool names targeted by `ToolByName` entries.
    pub fn tool_targets(&self) -> impl Iterator<Item = &str> {
        self.entries.values().filter_map(|strategy| match strategy {
            Strategy::ToolByName(tool) => Some(tool.as_str()),
            _ => None,
        })
    }
}
