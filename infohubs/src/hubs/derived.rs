//! The derived hub: facts computed on demand from the context and from
//! other facts.

use super::bag::EntryBag;
use super::proxy::CallableProxy;
use super::resolver::ResolverHub;
use crate::config::HubConfig;
use crate::context::{Content, Context};
use crate::core::{Handle, ResolutionState, Value};
use crate::errors::HubError;
use crate::observability::{ResolutionSpan, SpanTimer};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A factory producing one derived fact.
pub type FactoryFn = Arc<dyn Fn(&DerivedHub) -> Result<Value, HubError> + Send + Sync>;

/// Name of the pre-seeded entry holding the context.
pub const CONTEXT_KEY: &str = "context";

/// Static name to factory map shared by every derived hub.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, FactoryFn>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the registry with every built-in fact.
    #[must_use]
    pub fn standard() -> Self {
        crate::facts::register_all(Self::new())
    }

    /// Adds or replaces a factory.
    #[must_use]
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&DerivedHub) -> Result<Value, HubError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Gets the factory for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FactoryFn> {
        self.factories.get(name)
    }

    /// Returns true if a factory is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// A lazy cache of derived facts for one context.
///
/// Factories receive the hub itself, so they can read other facts, the
/// [`ResolverHub`] (through [`tools`](Self::tools)) and the configuration.
/// A factory that ends up requesting its own name fails with
/// [`HubError::CircularDependency`].
pub struct DerivedHub {
    tools: Arc<ResolverHub>,
    registry: Arc<FactoryRegistry>,
    config: Arc<HubConfig>,
    entries: EntryBag,
}

impl DerivedHub {
    /// Creates a derived hub on top of `tools`, seeded with the context.
    #[must_use]
    pub fn new(
        tools: Arc<ResolverHub>,
        registry: Arc<FactoryRegistry>,
        config: Arc<HubConfig>,
    ) -> Self {
        let entries = EntryBag::new();
        entries.seed(
            CONTEXT_KEY,
            Value::Handle(Handle::from_arc(Arc::clone(tools.context()))),
        );

        Self {
            tools,
            registry,
            config,
            entries,
        }
    }

    /// Returns the fact `name`, computing it on first access.
    pub fn get(&self, name: &str) -> Result<Value, HubError> {
        if let Some(value) = self.entries.peek(name) {
            return Ok(value);
        }
        self.entries.resolve_with(name, || self.compute(name))
    }

    fn compute(&self, name: &str) -> Result<Value, HubError> {
        let factory = self
            .registry
            .get(name)
            .ok_or_else(|| HubError::not_found(name))?;

        let timer = SpanTimer::start("derived");
        let result = factory(self);
        timer.finish(
            ResolutionSpan::new(self.tools.hub_id(), name),
            result.as_ref().err().map(ToString::to_string),
        );
        result
    }

    /// Returns a boolean fact.
    pub fn get_bool(&self, name: &str) -> Result<bool, HubError> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| HubError::type_mismatch(name, "a boolean"))
    }

    /// Returns a tri-state fact: `None` means "unknown".
    pub fn get_opt_bool(&self, name: &str) -> Result<Option<bool>, HubError> {
        match self.get(name)? {
            Value::None => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            _ => Err(HubError::type_mismatch(name, "a boolean or none")),
        }
    }

    /// Returns an integer fact.
    pub fn get_int(&self, name: &str) -> Result<i64, HubError> {
        self.get(name)?
            .as_int()
            .ok_or_else(|| HubError::type_mismatch(name, "an integer"))
    }

    /// Returns a text fact.
    pub fn get_str(&self, name: &str) -> Result<String, HubError> {
        match self.get(name)? {
            Value::Text(s) => Ok(s),
            _ => Err(HubError::type_mismatch(name, "a string")),
        }
    }

    /// Returns an optional text fact.
    pub fn get_opt_str(&self, name: &str) -> Result<Option<String>, HubError> {
        match self.get(name)? {
            Value::None => Ok(None),
            Value::Text(s) => Ok(Some(s)),
            _ => Err(HubError::type_mismatch(name, "a string or none")),
        }
    }

    /// Returns a handle fact.
    pub fn handle(&self, name: &str) -> Result<Handle, HubError> {
        match self.get(name)? {
            Value::Handle(handle) => Ok(handle),
            _ => Err(HubError::type_mismatch(name, "a handle")),
        }
    }

    /// Returns a handle fact downcast to a concrete type.
    pub fn downcast<T: std::any::Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, HubError> {
        self.handle(name)?
            .downcast::<T>()
            .ok_or_else(|| HubError::type_mismatch(name, std::any::type_name::<T>()))
    }

    /// Returns a capability fact, `None` when the fact is absent.
    pub fn capability<T>(&self, name: &str) -> Result<Option<Arc<T>>, HubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        super::capability_from(name, &self.get(name)?)
    }

    /// Returns a proxy fact.
    pub fn proxy<A, K, R>(&self, name: &str) -> Result<Arc<CallableProxy<A, K, R>>, HubError>
    where
        A: ?Sized + 'static,
        K: Send + Sync + 'static,
        R: Send + Sync + 'static,
    {
        self.downcast::<CallableProxy<A, K, R>>(name)
    }

    /// Looks `key` up in a string keyed proxy fact.
    pub fn lookup<R>(&self, name: &str, key: &str) -> Result<R, HubError>
    where
        R: Clone + Send + Sync + 'static,
    {
        self.proxy::<str, String, R>(name)?.get(key)
    }

    /// Returns the resolver hub.
    #[must_use]
    pub fn tools(&self) -> &Arc<ResolverHub> {
        &self.tools
    }

    /// Returns the context.
    #[must_use]
    pub fn context(&self) -> &Arc<Context> {
        self.tools.context()
    }

    /// Returns the published content item.
    #[must_use]
    pub fn content(&self) -> &dyn Content {
        self.context().content().as_ref()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.config
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

    /// Returns the number of resolved entries, `context` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the hub holds at least the context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Returns the resolved names, sorted.
    #[must_use]
    pub fn resolved_names(&self) -> Vec<String> {
        self.entries.names()
    }

    /// Returns the resolved entries as JSON, for debugging output.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, serde_json::Value> {
        self.entries.snapshot()
    }
}

impl std::fmt::Debug for DerivedHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedHub")
            .field("hub_id", &self.tools.hub_id())
            .field("resolved", &self.entries.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HubFixture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_context_is_seeded() {
        let (_, info) = HubFixture::new().build();

        assert!(info.contains(CONTEXT_KEY));
        let context = info.downcast::<Context>(CONTEXT_KEY).unwrap();
        assert!(Arc::ptr_eq(&context, info.context()));
    }

    #[test]
    fn test_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = FactoryRegistry::new().register("answer", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Int(42))
        });
        let (_, info) = HubFixture::new().with_registry(registry).build();

        assert_eq!(info.get_int("answer").unwrap(), 42);
        assert_eq!(info.get_int("answer").unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_name() {
        let (_, info) = HubFixture::new().with_registry(FactoryRegistry::new()).build();

        let err = info.get("nope").unwrap_err();
        assert!(matches!(err, HubError::NotFound { ref name } if name == "nope"));
    }

    #[test]
    fn test_factories_read_each_other() {
        let registry = FactoryRegistry::new()
            .register("base", |_| Ok(Value::Int(2)))
            .register("double", |hub| Ok(Value::Int(hub.get_int("base")? * 2)));
        let (_, info) = HubFixture::new().with_registry(registry).build();

        assert_eq!(info.get_int("double").unwrap(), 4);
        assert_eq!(info.resolved_names(), vec!["base", "context", "double"]);
    }

    #[test]
    fn test_circular_dependency() {
        let registry = FactoryRegistry::new()
            .register("a", |hub| hub.get("b"))
            .register("b", |hub| hub.get("a"));
        let (_, info) = HubFixture::new().with_registry(registry).build();

        match info.get("a") {
            Err(HubError::CircularDependency(err)) => {
                assert_eq!(err.chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected circular dependency, got {other:?}"),
        }
        assert_eq!(info.state("a"), ResolutionState::Unresolved);
    }

    #[test]
    fn test_typed_accessors_report_mismatch() {
        let registry = FactoryRegistry::new().register("text", |_| Ok(Value::from("x")));
        let (_, info) = HubFixture::new().with_registry(registry).build();

        assert_eq!(info.get_str("text").unwrap(), "x");
        assert_eq!(info.get_opt_str("text").unwrap().as_deref(), Some("x"));
        assert_eq!(info.get_bool("text").unwrap_err().kind(), "type_mismatch");
        assert_eq!(info.get_int("text").unwrap_err().kind(), "type_mismatch");
    }

    #[test]
    fn test_snapshot_renders_handles() {
        let registry = FactoryRegistry::new().register("flag", |_| Ok(Value::Bool(true)));
        let (_, info) = HubFixture::new().with_registry(registry).build();
        info.get("flag").unwrap();

        let snapshot = info.snapshot();
        assert_eq!(snapshot.get("flag"), Some(&serde_json::json!(true)));
        assert!(snapshot["context"].as_str().unwrap().contains("Context"));
    }
}
