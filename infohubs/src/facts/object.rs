//! Facts about the published content item.

use super::{brain_fact, brain_proxy, brain_value, FOLDER_TYPE};
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::{BookCapability, PresentationCapability, StructureCapability, StructureNumbers};
use tracing::warn;

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("my_uid", my_uid)
        .register("has_uid", has_uid)
        .register("context_as_brain", context_as_brain)
        .register("is_mine", is_mine)
        .register("cooperating_groups", cooperating_groups)
        .register("portal_type", |hub| Ok(Value::Text(hub.content().portal_type())))
        .register("context_url", |hub| Ok(Value::Text(hub.content().absolute_url())))
        .register("context_title", |hub| Ok(Value::Text(hub.content().title())))
        .register("context_owner", |hub| Ok(Value::from(hub.content().creator())))
        .register("path", |hub| Ok(Value::Text(hub.content().absolute_url_path())))
        .register("st_num", structure_number)
        .register("is_book", is_book)
        .register("is_presentation", is_presentation)
        .register("is_structural", is_structural)
        .register("bracket_default", |hub| Ok(Value::Bool(hub.config().bracket_default)))
}

fn my_uid(hub: &DerivedHub) -> Result<Value, HubError> {
    Ok(Value::from(hub.content().uid()))
}

fn has_uid(hub: &DerivedHub) -> Result<Value, HubError> {
    Ok(Value::Bool(hub.content().uid().is_some()))
}

fn context_as_brain(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(uid) = hub.get_opt_str("my_uid")? else {
        return Ok(Value::None);
    };
    Ok(brain_value(brain_proxy(hub)?.get(&uid)?))
}

/// The context belongs to the logged in user personally.
fn is_mine(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(user_id) = hub.get_opt_str("user_id")? else {
        return Ok(Value::Bool(false));
    };
    // A folder means the desktop itself, with no object selected.
    if hub.get_str("portal_type")? == FOLDER_TYPE {
        return Ok(Value::Bool(false));
    }
    let owner = hub.get_opt_str("context_owner")?;
    Ok(Value::Bool(owner.as_deref() == Some(user_id.as_str())))
}

fn cooperating_groups(hub: &DerivedHub) -> Result<Value, HubError> {
    if hub.get_str("portal_type")? == FOLDER_TYPE {
        return Ok(Value::List(Vec::new()));
    }

    match hub.content().collaborating_groups() {
        Ok(groups) => Ok(Value::from(groups)),
        Err(err) => {
            warn!(
                content = %hub.content().id(),
                error = %err,
                "Could not read collaborating groups"
            );
            Ok(Value::List(Vec::new()))
        }
    }
}

/// Structure number of a book chapter; `0` when the numbering browser is
/// missing, `None` outside of books.
fn structure_number(hub: &DerivedHub) -> Result<Value, HubError> {
    if hub.get_opt_bool("is_book")? != Some(true) {
        return Ok(Value::None);
    }
    let Some(numbers) = hub.tools().capability::<dyn StructureNumbers>("structurenumber")? else {
        return Ok(Value::Int(0));
    };
    let uid = hub.get_opt_str("my_uid")?;
    Ok(Value::from(numbers.number_for(uid.as_deref())))
}

fn is_book(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(book) = hub.tools().capability::<dyn BookCapability>("book")? else {
        return Ok(Value::None);
    };
    let brain = brain_fact(hub, "context_as_brain")?;
    Ok(Value::Bool(book.is_book(brain.as_deref())))
}

fn is_presentation(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(presentation) = hub
        .tools()
        .capability::<dyn PresentationCapability>("presentation")?
    else {
        return Ok(Value::None);
    };
    let uid = hub.get_opt_str("my_uid")?;
    Ok(Value::Bool(presentation.is_presentation(uid.as_deref())))
}

fn is_structural(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(structure) = hub.tools().capability::<dyn StructureCapability>("structuretype")? else {
        return Ok(Value::None);
    };
    let brain = brain_fact(hub, "context_as_brain")?;
    Ok(Value::Bool(structure.structure_folder(brain.as_deref()).is_some()))
}
