//! The built-in facts of the derived hub.
//!
//! Facts are grouped by what they describe:
//! - `object`: the published content item
//! - `request`: form values and template state
//! - `uid`: UID lookups and the language-aware object resolution
//! - `group`: the active collaboration group and group titles
//! - `portal`, `user`, `images` and `misc`

mod group;
mod images;
mod misc;
mod object;
mod portal;
mod request;
mod translation;
mod uid;
mod user;

pub use group::{select_group, GroupResolution, INCONSISTENT_GROUP};
pub use images::{parse_size_table, SizeTable};
pub use misc::{Counter, Counters};
pub use translation::resolve_translation;

use crate::context::BrainRef;
use crate::context::ContentRef;
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{CallableProxy, DerivedHub, FactoryRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// Proxy over single-UID brain lookups (`uid2brain`).
pub type BrainProxy = CallableProxy<str, String, Option<BrainRef>>;

/// Proxy from a string key to optional text (`uid2url`, `uid2path`, ...).
pub type TextProxy = CallableProxy<str, String, Option<String>>;

/// Proxy from a string key to a flag (`has_perm`, `is_member_of`).
pub type FlagProxy = CallableProxy<str, String, bool>;

/// Proxy from a size name to its width (`named_width`).
pub type WidthProxy = CallableProxy<str, String, Option<i64>>;

/// Proxy behind `my_translation`, keyed by the normalized specifier set.
pub type TranslationProxy =
    CallableProxy<HashMap<String, Option<String>>, Vec<(String, String)>, Option<ContentRef>>;

/// Content type of containers that are never collaboration objects.
pub(crate) const FOLDER_TYPE: &str = "Folder";

/// Registers every built-in fact.
#[must_use]
pub fn register_all(registry: FactoryRegistry) -> FactoryRegistry {
    let registry = object::register(registry);
    let registry = request::register(registry);
    let registry = uid::register(registry);
    let registry = group::register(registry);
    let registry = portal::register(registry);
    let registry = user::register(registry);
    let registry = images::register(registry);
    misc::register(registry)
}

/// Wraps a collaborator failure raised while computing `name`.
pub(crate) fn collaborator(name: &'static str) -> impl FnOnce(anyhow::Error) -> HubError {
    move |source| HubError::collaborator(name, source)
}

/// Reads a brain stored as a handle fact.
pub(crate) fn brain_fact(hub: &DerivedHub, name: &str) -> Result<Option<BrainRef>, HubError> {
    hub.capability::<dyn crate::context::Brain>(name)
}

/// Reads a handle fact of a concrete type that may be `None`.
pub(crate) fn optional<T>(hub: &DerivedHub, name: &str) -> Result<Option<Arc<T>>, HubError>
where
    T: std::any::Any + Send + Sync,
{
    match hub.get(name)? {
        Value::None => Ok(None),
        _ => hub.downcast::<T>(name).map(Some),
    }
}

/// Reads the `uid2brain` proxy.
pub(crate) fn brain_proxy(hub: &DerivedHub) -> Result<Arc<BrainProxy>, HubError> {
    hub.proxy::<str, String, Option<BrainRef>>("uid2brain")
}

/// Stores a brain as a handle fact.
pub(crate) fn brain_value(brain: Option<BrainRef>) -> Value {
    brain.map_or(Value::None, Value::handle)
}
