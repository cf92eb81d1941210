//! Facts read from the request and the published template.

use crate::core::{Handle, Value};
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::{ContextState, ExportProfiles};
use std::sync::Arc;

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("request", |hub| {
            Ok(Value::Handle(Handle::from_arc(Arc::clone(hub.context().request()))))
        })
        .register("request_var", request_var)
        .register("audit_mode", |hub| Ok(Value::Bool(form_flag(hub, "audit-mode", true))))
        .register("tooltip_divs", |hub| Ok(Value::Bool(form_flag(hub, "tooltip_divs", true))))
        .register("uid", |hub| Ok(Value::from(form_text(hub, "uid"))))
        .register("export_profile_id", |hub| Ok(Value::from(form_text(hub, "pid"))))
        .register("export_profile", export_profile)
        .register("export_profile_title", export_profile_title)
        .register("template_id", |hub| hub.tools().get("templateid"))
        .register("is_view_template", |hub| {
            Ok(Value::Bool(context_state(hub)?.is_view_template()))
        })
        .register("view_template_id", |hub| {
            Ok(Value::Text(context_state(hub)?.view_template_id()))
        })
        .register("view_url", |hub| Ok(Value::Text(context_state(hub)?.view_url())))
}

fn request_var(hub: &DerivedHub) -> Result<Value, HubError> {
    let form = &hub.context().request().form;
    Ok(Value::Map(
        form.iter()
            .map(|(key, value)| (key.clone(), Value::Text(value.clone())))
            .collect(),
    ))
}

/// A non-empty form value.
fn form_text(hub: &DerivedHub, key: &str) -> Option<String> {
    hub.context()
        .request()
        .form_value(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// A boolean form value; `default` when absent.
fn form_flag(hub: &DerivedHub, key: &str, default: bool) -> bool {
    hub.context()
        .request()
        .form_value(key)
        .map_or(default, parse_flag)
}

/// Reads the usual spellings of yes and no.
pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "y"
    )
}

fn context_state(hub: &DerivedHub) -> Result<Arc<dyn ContextState>, HubError> {
    hub.tools().require::<dyn ContextState>("plone_context_state")
}

fn export_profile(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(pid) = hub.get_opt_str("export_profile_id")? else {
        return Ok(Value::None);
    };
    let export = hub.tools().require::<dyn ExportProfiles>("export")?;
    Ok(export
        .raw_profile(&pid)
        .map_or(Value::None, |raw| Value::from_json(&raw)))
}

fn export_profile_title(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(pid) = hub.get_opt_str("export_profile_id")? else {
        return Ok(Value::None);
    };
    let export = hub.tools().require::<dyn ExportProfiles>("export")?;
    Ok(Value::from(export.profile_title(&pid)))
}
