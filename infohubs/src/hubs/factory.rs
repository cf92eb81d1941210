//! Construction of hub pairs from shared, immutable tables.

use super::derived::{DerivedHub, FactoryRegistry};
use super::naming::ToolDetector;
use super::resolver::ResolverHub;
use super::strategy::StrategyTable;
use crate::config::HubConfig;
use crate::context::Context;
use crate::ports::Environment;
use std::sync::Arc;
use tracing::debug;

/// Builds a [`ResolverHub`] and a [`DerivedHub`] per context.
///
/// Everything a factory holds is built once at startup and shared
/// read-only between all hub pairs it creates.
///
/// ```
/// use infohubs::prelude::*;
/// use infohubs::testing::{StaticContent, StaticEnvironment};
/// use std::sync::Arc;
///
/// let factory = HubFactory::new(HubConfig::default(), Arc::new(StaticEnvironment::new()));
/// let context = Context::new(Arc::new(StaticContent::new("front-page", "Document")), Request::new());
/// let (_hub, info) = factory.make_hubs(context);
///
/// assert_eq!(info.get_str("portal_type").unwrap(), "Document");
/// ```
#[derive(Clone)]
pub struct HubFactory {
    config: Arc<HubConfig>,
    environment: Arc<dyn Environment>,
    strategies: Arc<StrategyTable>,
    registry: Arc<FactoryRegistry>,
    detector: Arc<ToolDetector>,
}

impl HubFactory {
    /// Creates a factory with the standard strategy table and registry.
    #[must_use]
    pub fn new(config: HubConfig, environment: Arc<dyn Environment>) -> Self {
        let strategies = StrategyTable::standard(&config);
        Self::with_tables(config, environment, strategies, FactoryRegistry::standard())
    }

    /// Creates a factory with custom tables.
    #[must_use]
    pub fn with_tables(
        config: HubConfig,
        environment: Arc<dyn Environment>,
        strategies: StrategyTable,
        registry: FactoryRegistry,
    ) -> Self {
        let detector = ToolDetector::from_config(&config.tool_detector, strategies.tool_targets());

        Self {
            config: Arc::new(config),
            environment,
            strategies: Arc::new(strategies),
            registry: Arc::new(registry),
            detector: Arc::new(detector),
        }
    }

    /// Creates the hub pair for `context`.
    #[must_use]
    pub fn make_hubs(&self, context: Context) -> (Arc<ResolverHub>, DerivedHub) {
        let context = Arc::new(context);
        debug!(
            hub_id = %context.request_id(),
            portal_type = %context.content().portal_type(),
            "Creating hub pair"
        );

        let tools = Arc::new(ResolverHub::new(
            context,
            Arc::clone(&self.environment),
            Arc::clone(&self.strategies),
            Arc::clone(&self.detector),
            self.config.view_suffix.clone(),
        ));
        let info = DerivedHub::new(
            Arc::clone(&tools),
            Arc::clone(&self.registry),
            Arc::clone(&self.config),
        );

        (tools, info)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Returns the strategy table.
    #[must_use]
    pub fn strategies(&self) -> &StrategyTable {
        &self.strategies
    }

    /// Returns the factory registry.
    #[must_use]
    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    /// Returns the tool detector.
    #[must_use]
    pub fn detector(&self) -> &ToolDetector {
        &self.detector
    }
}

impl std::fmt::Debug for HubFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubFactory")
            .field("strategies", &self.strategies.len())
            .field("factories", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Request;
    use crate::testing::{StaticContent, StaticEnvironment};

    #[test]
    fn test_pairs_do_not_share_entries() {
        let factory = HubFactory::new(HubConfig::default(), Arc::new(StaticEnvironment::new()));
        let content = Arc::new(StaticContent::new("doc", "Document"));

        let (_, first) = factory.make_hubs(Context::new(content.clone(), Request::new()));
        let (_, second) = factory.make_hubs(Context::new(content, Request::new()));

        first.get("portal_type").unwrap();
        assert!(first.contains("portal_type"));
        assert!(!second.contains("portal_type"));
    }

    #[test]
    fn test_detector_knows_alias_targets() {
        let factory = HubFactory::new(HubConfig::default(), Arc::new(StaticEnvironment::new()));

        assert!(factory.detector().is_tool("acl_users"));
        assert!(factory.detector().is_tool("plone_utils"));
        assert!(!factory.detector().is_tool("book"));
        assert!(factory.registry().contains("gid"));
    }
}
