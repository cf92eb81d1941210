//! UID lookups against the search index.
//!
//! Every fact here is a proxy: lookups are memoized per UID for the
//! lifetime of the hub pair, and an unknown UID yields `None`.

use super::{brain_proxy, translation, BrainProxy, TextProxy};
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::SearchIndex;
use crate::utils::strip_site_root;

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("uid2brain", uid2brain)
        .register("uid2url", uid2url)
        .register("uid2fullpath", uid2fullpath)
        .register("uid2path", uid2path)
        .register("my_translation", translation::my_translation)
}

fn uid2brain(hub: &DerivedHub) -> Result<Value, HubError> {
    let catalog = hub.tools().require::<dyn SearchIndex>("portal_catalog")?;
    // First hit wins when the UID is ambiguous.
    let proxy: BrainProxy = BrainProxy::by_key(move |uid| Ok(catalog.find_by_uid(uid)));
    Ok(Value::handle(proxy))
}

fn uid2url(hub: &DerivedHub) -> Result<Value, HubError> {
    let catalog = hub.tools().require::<dyn SearchIndex>("portal_catalog")?;
    let proxy = TextProxy::by_key(move |uid| {
        Ok(catalog
            .unrestricted_find_by_uid(uid)
            .first()
            .map(|brain| brain.url()))
    });
    Ok(Value::handle(proxy))
}

fn uid2fullpath(hub: &DerivedHub) -> Result<Value, HubError> {
    let brains = brain_proxy(hub)?;
    let proxy = TextProxy::by_key(move |uid| Ok(brains.get(uid)?.map(|brain| brain.path())));
    Ok(Value::handle(proxy))
}

/// Like `uid2fullpath`, without the site root segment.
fn uid2path(hub: &DerivedHub) -> Result<Value, HubError> {
    let brains = brain_proxy(hub)?;
    let proxy = TextProxy::by_key(move |uid| {
        Ok(brains.get(uid)?.map(|brain| strip_site_root(&brain.path())))
    });
    Ok(Value::handle(proxy))
}
