//! The resolver hub: lazily fetched tools, adapters, views and browsers.

use super::bag::EntryBag;
use super::naming::ToolDetector;
use super::strategy::{Strategy, StrategyTable};
use crate::context::Context;
use crate::core::{Handle, ResolutionState, StrategyKind, Value};
use crate::errors::HubError;
use crate::observability::{ResolutionSpan, SpanTimer};
use crate::ports::Environment;
use std::sync::Arc;

/// A lazy cache of environment lookups for one context.
///
/// Names are resolved on first access by, in order:
/// 1. the explicit [`StrategyTable`],
/// 2. the view rule (name ends with the view suffix or contains `-`),
/// 3. the [`ToolDetector`],
/// 4. a browser lookup that yields [`Value::None`] when nothing is found.
///
/// Resolved values never change. Failed lookups are not cached.
pub struct ResolverHub {
    context: Arc<Context>,
    environment: Arc<dyn Environment>,
    strategies: Arc<StrategyTable>,
    detector: Arc<ToolDetector>,
    view_suffix: String,
    entries: EntryBag,
}

impl ResolverHub {
    /// Creates a resolver hub bound to `context`.
    #[must_use]
    pub fn new(
        context: Arc<Context>,
        environment: Arc<dyn Environment>,
        strategies: Arc<StrategyTable>,
        detector: Arc<ToolDetector>,
        view_suffix: impl Into<String>,
    ) -> Self {
        Self {
            context,
            environment,
            strategies,
            detector,
            view_suffix: view_suffix.into(),
            entries: EntryBag::new(),
        }
    }

    /// Returns the entry for `name`, resolving it on first access.
    pub fn get(&self, name: &str) -> Result<Value, HubError> {
        if let Some(value) = self.entries.peek(name) {
            return Ok(value);
        }
        self.entries.resolve_with(name, || self.resolve(name))
    }

    /// Returns the entry for `name` as a capability, `None` when the lookup
    /// found nothing.
    pub fn capability<T>(&self, name: &str) -> Result<Option<Arc<T>>, HubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        super::capability_from(name, &self.get(name)?)
    }

    /// Like [`capability`](Self::capability), but a missing entry is an
    /// error.
    pub fn require<T>(&self, name: &str) -> Result<Arc<T>, HubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.capability::<T>(name)?
            .ok_or_else(|| HubError::type_mismatch(name, std::any::type_name::<T>()))
    }

    /// Returns the kind of strategy `name` would be resolved with.
    #[must_use]
    pub fn strategy_for(&self, name: &str) -> Option<StrategyKind> {
        match self.strategies.get(name) {
            Some(strategy) => strategy.kind(),
            None if self.is_view_name(name) => Some(StrategyKind::View),
            None if self.detector.is_tool(name) => Some(StrategyKind::Tool),
            None => Some(StrategyKind::Browser),
        }
    }

    fn is_view_name(&self, name: &str) -> bool {
        name.ends_with(&self.view_suffix) || name.contains('-')
    }

    fn resolve(&self, name: &str) -> Result<Value, HubError> {
        let timer = SpanTimer::start("resolver");
        let mut span = ResolutionSpan::new(self.hub_id(), name);
        if let Some(kind) = self.strategy_for(name) {
            span = span.with_strategy(kind);
        }

        let result = self.dispatch(name);
        timer.finish(span, result.as_ref().err().map(ToString::to_string));
        result
    }

    fn dispatch(&self, name: &str) -> Result<Value, HubError> {
        let context = self.context.as_ref();

        match self.strategies.get(name) {
            Some(Strategy::EnvironmentAdapter) => self
                .environment
                .adapter(context, name)
                .map(Value::Handle)
                .map_err(|source| lookup_error("adapter", name, source)),
            Some(Strategy::ToolByName(tool)) => self.fetch_tool(tool),
            Some(Strategy::ContextOnlyFactory(factory)) => factory(context),
            Some(Strategy::Unsupported { tool, method }) => Err(HubError::UnsupportedStrategy {
                name: name.to_string(),
                tool: tool.clone(),
                method: method.clone(),
            }),
            None if self.is_view_name(name) => self
                .environment
                .view(context, name)
                .map(Value::Handle)
                .map_err(|source| lookup_error("view", name, source)),
            None if self.detector.is_tool(name) => self.fetch_tool(name),
            None => Ok(self
                .environment
                .browser(context, name)
                .map_or(Value::None, Value::Handle)),
        }
    }

    fn fetch_tool(&self, tool: &str) -> Result<Value, HubError> {
        self.environment
            .tool(&self.context, tool)
            .map(Value::Handle)
            .map_err(|source| lookup_error("tool", tool, source))
    }

    /// Returns true if `name` is resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.peek(name).is_some()
    }

    /// Returns the resolution state of `name`.
    #[must_use]
    pub fn state(&self, name: &str) -> ResolutionState {
        self.entries.state(name)
    }

    /// Returns the number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Returns the resolved names, sorted.
    #[must_use]
    pub fn resolved_names(&self) -> Vec<String> {
        self.entries.names()
    }

    /// Returns the context this hub is bound to.
    #[must_use]
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Returns the id used in log records of this hub pair.
    #[must_use]
    pub fn hub_id(&self) -> String {
        self.context.request_id().to_string()
    }

    /// Stores a handle under `name` without running a strategy.
    ///
    /// Does nothing if `name` is already resolved.
    pub fn preload(&self, name: &str, handle: Handle) {
        if !self.contains(name) {
            self.entries.seed(name, Value::Handle(handle));
        }
    }
}

impl std::fmt::Debug for ResolverHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverHub")
            .field("hub_id", &self.hub_id())
            .field("resolved", &self.entries.names())
            .finish_non_exhaustive()
    }
}

fn lookup_error(kind: &'static str, name: &str, source: anyhow::Error) -> HubError {
    HubError::Lookup {
        kind,
        name: name.to_string(),
        source,
    }
}
