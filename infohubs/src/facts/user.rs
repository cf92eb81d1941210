//! The logged in user, the author profile and permissions.
//!
//! Each step of the chain `logged_in -> user_object -> user_id ->
//! author_object -> user_email` yields `None` when its predecessor does.

use super::{optional, FlagProxy};
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::{AuthorDirectory, AuthorProfile, Member, Membership};
use std::sync::Arc;

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("logged_in", |hub| Ok(Value::Bool(!membership(hub)?.is_anonymous())))
        .register("user_object", user_object)
        .register("user_id", |hub| {
            Ok(Value::from(member(hub)?.map(|member| member.id.clone())))
        })
        .register("author_object", author_object)
        .register("user_email", |hub| {
            let author = optional::<AuthorProfile>(hub, "author_object")?;
            Ok(Value::from(author.and_then(|author| author.email.clone())))
        })
        .register("has_perm", has_perm)
}

fn membership(hub: &DerivedHub) -> Result<Arc<dyn Membership>, HubError> {
    hub.tools().require::<dyn Membership>("portal_membership")
}

fn member(hub: &DerivedHub) -> Result<Option<Arc<Member>>, HubError> {
    optional::<Member>(hub, "user_object")
}

fn user_object(hub: &DerivedHub) -> Result<Value, HubError> {
    if !hub.get_bool("logged_in")? {
        return Ok(Value::None);
    }
    Ok(membership(hub)?
        .authenticated_member()
        .map_or(Value::None, Value::handle))
}

/// The author profile; `None` for anonymous users and when no author
/// directory is installed.
fn author_object(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(user_id) = hub.get_opt_str("user_id")? else {
        return Ok(Value::None);
    };
    let Some(authors) = hub.tools().capability::<dyn AuthorDirectory>("author")? else {
        return Ok(Value::None);
    };
    Ok(authors.by_user_id(&user_id).map_or(Value::None, Value::handle))
}

/// Proxy `permission -> bool` for the current user on the context.
fn has_perm(hub: &DerivedHub) -> Result<Value, HubError> {
    let membership = membership(hub)?;
    let context = Arc::clone(hub.context());
    let proxy = FlagProxy::by_key(move |permission| {
        Ok(membership.check_permission(permission, &context))
    });
    Ok(Value::handle(proxy))
}
