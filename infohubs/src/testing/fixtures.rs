//! A builder for complete hub pairs in tests.

use super::{
    MemoryCatalog, MemorySession, StaticContent, StaticEnvironment, StaticMembership,
    StaticPortalState,
};
use crate::config::HubConfig;
use crate::context::{Content, Context, ContentRef, Request};
use crate::core::Handle;
use crate::hubs::{DerivedHub, FactoryRegistry, HubFactory, ResolverHub, StrategyTable};
use crate::ports::{Membership, PortalState, SearchIndex, SessionStore};
use std::sync::Arc;

/// Builds a hub pair over in-memory collaborators.
///
/// The membership, catalog, session and portal state are registered as
/// `portal_membership`, `portal_catalog`, `session_data_manager` and
/// `plone_portal_state` on top of whatever the environment already holds.
/// By default the context is a `Document` with UID `doc-uid`, viewed by
/// an anonymous user.
pub struct HubFixture {
    config: HubConfig,
    content: ContentRef,
    request: Request,
    environment: StaticEnvironment,
    registry: Option<FactoryRegistry>,
    membership: Arc<dyn Membership>,
    catalog: Arc<dyn SearchIndex>,
    session: Arc<MemorySession>,
    portal: Arc<dyn PortalState>,
}

impl HubFixture {
    /// Creates a fixture with defaults.
    #[must_use]
    pub fn new() -> Self {
        let site: ContentRef =
            Arc::new(StaticContent::new("plone", "Plone Site").with_path("/plone"));
        Self {
            config: HubConfig::default(),
            content: Arc::new(StaticContent::new("doc", "Document").with_uid("doc-uid")),
            request: Request::new(),
            environment: StaticEnvironment::new(),
            registry: None,
            membership: Arc::new(StaticMembership::anonymous()),
            catalog: Arc::new(MemoryCatalog::new()),
            session: Arc::new(MemorySession::new()),
            portal: Arc::new(StaticPortalState::new(site)),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the context object.
    #[must_use]
    pub fn with_content<C: Content + 'static>(self, content: C) -> Self {
        self.with_content_ref(Arc::new(content))
    }

    /// Replaces the context object with a shared one.
    #[must_use]
    pub fn with_content_ref(mut self, content: ContentRef) -> Self {
        self.content = content;
        self
    }

    /// Replaces the request.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = request;
        self
    }

    /// Replaces the environment the collaborators are added to.
    #[must_use]
    pub fn with_environment(mut self, environment: StaticEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Uses `registry` instead of the built-in facts.
    #[must_use]
    pub fn with_registry(mut self, registry: FactoryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the membership tool.
    #[must_use]
    pub fn with_membership(mut self, membership: Arc<dyn Membership>) -> Self {
        self.membership = membership;
        self
    }

    /// Replaces the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn SearchIndex>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the session.
    #[must_use]
    pub fn with_session(mut self, session: Arc<MemorySession>) -> Self {
        self.session = session;
        self
    }

    /// Replaces the portal state.
    #[must_use]
    pub fn with_portal(mut self, portal: Arc<dyn PortalState>) -> Self {
        self.portal = portal;
        self
    }

    /// The session the hubs write to.
    #[must_use]
    pub fn session(&self) -> &Arc<MemorySession> {
        &self.session
    }

    /// The environment, sharing lookup counts with every built hub.
    #[must_use]
    pub fn environment(&self) -> &StaticEnvironment {
        &self.environment
    }

    /// Builds a fresh hub pair.
    #[must_use]
    pub fn build(&self) -> (Arc<ResolverHub>, DerivedHub) {
        let session: Arc<dyn SessionStore> = self.session.clone();
        let environment = self
            .environment
            .clone()
            .with_tool("portal_membership", Handle::new(Arc::clone(&self.membership)))
            .with_tool("portal_catalog", Handle::new(Arc::clone(&self.catalog)))
            .with_tool("session_data_manager", Handle::new(session))
            .with_tool("plone_portal_state", Handle::new(Arc::clone(&self.portal)));

        let strategies = StrategyTable::standard(&self.config);
        let registry = self.registry.clone().unwrap_or_else(FactoryRegistry::standard);
        let factory = HubFactory::with_tables(
            self.config.clone(),
            Arc::new(environment),
            strategies,
            registry,
        );
        factory.make_hubs(Context::new(Arc::clone(&self.content), self.request.clone()))
    }
}

impl Default for HubFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HubFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubFixture")
            .field("content", &self.content.id())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
