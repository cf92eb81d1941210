//! Lookup of tools, adapters and views in the hosting environment.

use crate::context::Context;
use crate::core::Handle;

/// The hosting framework's component lookup.
///
/// `tool`, `adapter` and `view` fail when the name is unknown; `browser` is
/// the soft variant and returns `None` instead.
pub trait Environment: Send + Sync {
    /// Fetches a tool by name.
    fn tool(&self, context: &Context, name: &str) -> anyhow::Result<Handle>;

    /// Fetches a named adapter of the context.
    fn adapter(&self, context: &Context, name: &str) -> anyhow::Result<Handle>;

    /// Traverses to a view that is required to exist.
    fn view(&self, context: &Context, name: &str) -> anyhow::Result<Handle>;

    /// Traverses to a browser view, if there is one.
    fn browser(&self, context: &Context, name: &str) -> Option<Handle>;
}
