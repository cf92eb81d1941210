//! Language-aware resolution of referenced objects (`my_translation`).

use super::{brain_proxy, collaborator, BrainProxy, TranslationProxy};
use crate::context::{Content, ContentRef};
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::DerivedHub;
use crate::utils::sorted_nonempty_items;
use std::sync::Arc;
use tracing::warn;

/// Builds the `my_translation` proxy.
///
/// The proxy takes a map with `path` and/or `uid` entries; maps with the
/// same non-`None` entries share one cache slot.
pub(super) fn my_translation(hub: &DerivedHub) -> Result<Value, HubError> {
    let lang = hub.get_opt_str("current_lang")?;
    let portal = hub.capability::<dyn Content>("portal_object")?;
    let brains = brain_proxy(hub)?;

    let proxy = TranslationProxy::with_normalizer(
        move |items: &Vec<(String, String)>| {
            resolve_translation(items, lang.as_deref(), portal.as_deref(), &brains)
        },
        sorted_nonempty_items,
    );
    Ok(Value::handle(proxy))
}

/// Finds the object named by `path` or `uid` and swaps in its translation
/// for `lang`.
///
/// The first specifier that yields an object wins. Returns `None` when the
/// specifiers match nothing, or when the object is in another language and
/// has no translation for `lang`. Fails if no specifier is given at all.
pub fn resolve_translation(
    items: &[(String, String)],
    lang: Option<&str>,
    portal: Option<&dyn Content>,
    brains: &BrainProxy,
) -> Result<Option<ContentRef>, HubError> {
    let mut specs = 0;
    let mut found: Option<ContentRef> = None;

    for (key, value) in items {
        match key.as_str() {
            "path" => {
                let path = value.strip_prefix('/').unwrap_or(value);
                if path.is_empty() {
                    continue;
                }
                specs += 1;
                let traversed = portal
                    .ok_or_else(|| anyhow::anyhow!("no portal object"))
                    .and_then(|portal| portal.restricted_traverse(path));
                match traversed {
                    Ok(object) => found = Some(object),
                    Err(err) => warn!(path, error = %err, "Path not found"),
                }
            }
            "uid" if !value.is_empty() => {
                specs += 1;
                if let Some(brain) = brains.get(value)? {
                    found = Some(brain.object().map_err(collaborator("my_translation"))?);
                }
            }
            _ => {}
        }
        if found.is_some() {
            break;
        }
    }

    let Some(object) = found else {
        if specs == 0 {
            return Err(HubError::configuration(format!(
                "neither path nor uid given: {items:?}"
            )));
        }
        return Ok(None);
    };

    match lang {
        Some(lang) => Ok(translate(object, lang)),
        None => Ok(Some(object)),
    }
}

fn translate(object: ContentRef, lang: &str) -> Option<ContentRef> {
    let object_lang = match object.language() {
        Some(object_lang) => object_lang,
        None => {
            warn!(object = %object.id(), "Object has no language");
            return Some(object);
        }
    };
    if object_lang.is_empty() || object_lang == lang {
        return Some(object);
    }

    match object.translations() {
        None => Some(object),
        Some(Ok(translations)) => translations
            .get(lang)
            .and_then(|candidates| candidates.first())
            .map(Arc::clone),
        Some(Err(err)) => {
            warn!(object = %object.id(), error = %err, "Translation lookup failed");
            match object.canonical() {
                Some(Ok(canonical)) => Some(canonical),
                Some(Err(err)) => {
                    warn!(object = %object.id(), error = %err, "Canonical lookup failed");
                    Some(object)
                }
                None => Some(object),
            }
        }
    }
}
