//! Facts about the portal root and the personal desktop.

use super::{brain_fact, brain_proxy, brain_value};
use crate::context::Content;
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::PortalState;
use std::sync::Arc;
use tracing::warn;

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("portal_object", |hub| Ok(Value::handle(portal_state(hub)?.portal())))
        .register("portal_url", |hub| Ok(Value::Text(portal(hub)?.absolute_url())))
        .register("portal_id", |hub| Ok(Value::Text(portal(hub)?.id())))
        .register("site_object", |hub| Ok(Value::handle(portal_state(hub)?.site())))
        .register("portal_and_site_objects", |hub| {
            let state = portal_state(hub)?;
            Ok(Value::Bool(Arc::ptr_eq(&state.portal(), &state.site())))
        })
        .register("temp_folder", temp_folder)
        .register("current_lang", |hub| Ok(Value::from(portal_state(hub)?.language())))
        .register("desktop_brain", desktop_brain)
        .register("desktop_url", |hub| {
            Ok(Value::from(
                brain_fact(hub, "desktop_brain")?.map(|brain| brain.url()),
            ))
        })
}

fn portal_state(hub: &DerivedHub) -> Result<Arc<dyn PortalState>, HubError> {
    hub.tools().require::<dyn PortalState>("plone_portal_state")
}

fn portal(hub: &DerivedHub) -> Result<Arc<dyn Content>, HubError> {
    hub.capability::<dyn Content>("portal_object")?
        .ok_or_else(|| HubError::type_mismatch("portal_object", "a content object"))
}

/// The portal's `temp` child, or `None` if it cannot be reached.
fn temp_folder(hub: &DerivedHub) -> Result<Value, HubError> {
    match portal(hub)?.restricted_traverse("temp") {
        Ok(folder) => Ok(Value::handle(folder)),
        Err(err) => {
            warn!(error = %err, "Temp folder not found");
            Ok(Value::None)
        }
    }
}

/// The catalog record of the personal desktop, if one is configured.
fn desktop_brain(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(uid) = hub.config().desktop_uid.clone() else {
        return Ok(Value::None);
    };
    Ok(brain_value(brain_proxy(hub)?.get(&uid)?))
}
