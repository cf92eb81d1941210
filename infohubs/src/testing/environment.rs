//! A hosting environment backed by plain maps.

use crate::context::Context;
use crate::core::Handle;
use crate::ports::Environment;
use anyhow::anyhow;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// An [`Environment`] that serves registered handles and counts lookups.
///
/// Clones share the lookup counter, so a test can keep one clone and hand
/// the other to the hubs.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    tools: HashMap<String, Handle>,
    adapters: HashMap<String, Handle>,
    views: HashMap<String, Handle>,
    browsers: HashMap<String, Handle>,
    lookups: Arc<Mutex<HashMap<String, usize>>>,
}

impl StaticEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    #[must_use]
    pub fn with_tool(mut self, name: impl Into<String>, handle: Handle) -> Self {
        self.tools.insert(name.into(), handle);
        self
    }

    /// Registers an adapter.
    #[must_use]
    pub fn with_adapter(mut self, name: impl Into<String>, handle: Handle) -> Self {
        self.adapters.insert(name.into(), handle);
        self
    }

    /// Registers a view.
    #[must_use]
    pub fn with_view(mut self, name: impl Into<String>, handle: Handle) -> Self {
        self.views.insert(name.into(), handle);
        self
    }

    /// Registers a browser view.
    #[must_use]
    pub fn with_browser(mut self, name: impl Into<String>, handle: Handle) -> Self {
        self.browsers.insert(name.into(), handle);
        self
    }

    /// How often `name` was looked up, in any category.
    #[must_use]
    pub fn lookups(&self, name: &str) -> usize {
        self.lookups.lock().get(name).copied().unwrap_or(0)
    }

    fn record(&self, name: &str) {
        *self.lookups.lock().entry(name.to_string()).or_insert(0) += 1;
    }
}

impl Environment for StaticEnvironment {
    fn tool(&self, _context: &Context, name: &str) -> anyhow::Result<Handle> {
        self.record(name);
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no tool named {name:?}"))
    }

    fn adapter(&self, _context: &Context, name: &str) -> anyhow::Result<Handle> {
        self.record(name);
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no adapter named {name:?}"))
    }

    fn view(&self, _context: &Context, name: &str) -> anyhow::Result<Handle> {
        self.record(name);
        self.views
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no view named {name:?}"))
    }

    fn browser(&self, _context: &Context, name: &str) -> Option<Handle> {
        self.record(name);
        self.browsers.get(name).cloned()
    }
}
