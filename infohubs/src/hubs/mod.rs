//! The two lazy caches and their building blocks.
//!
//! This module provides:
//! - `ResolverHub` for environment lookups (tools, adapters, views, browsers)
//! - `DerivedHub` and `FactoryRegistry` for computed facts
//! - `CallableProxy` for memoized, parameterized facts
//! - `HubFactory` to build a hub pair per context

mod bag;
mod derived;
mod factory;
#[cfg(test)]
mod integration_tests;
mod naming;
mod proxy;
mod resolver;
mod strategy;

pub use derived::{DerivedHub, FactoryFn, FactoryRegistry, CONTEXT_KEY};
pub use factory::HubFactory;
pub use naming::{classify, ToolDetector};
pub use proxy::CallableProxy;
pub use resolver::ResolverHub;
pub use strategy::{ContextFactoryFn, Strategy, StrategyTable};

use crate::core::Value;
use crate::errors::HubError;
use std::sync::Arc;

/// Reads a capability stored as `Arc<T>` in a handle entry.
fn capability_from<T>(name: &str, value: &Value) -> Result<Option<Arc<T>>, HubError>
where
    T: ?Sized + Send + Sync + 'static,
{
    match value {
        Value::None => Ok(None),
        Value::Handle(handle) => handle
            .capability::<T>()
            .map(Some)
            .ok_or_else(|| HubError::type_mismatch(name, std::any::type_name::<T>())),
        _ => Err(HubError::type_mismatch(name, "a handle")),
    }
}
