//! The active collaboration group (`gid`) and related facts.

use super::{FlagProxy, FOLDER_TYPE};
use crate::core::{Handle, Value};
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::{GroupDirectory, Membership, SessionStore};
use crate::utils::{group_id_from_form, UniqueStack};
use tracing::{debug, error};

/// Value of `gid` when no group can be determined although the context
/// should only be reachable through one.
pub const INCONSISTENT_GROUP: &str = "ERROR";

/// Outcome of the group selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution {
    /// A collaboration group is active.
    Group(String),
    /// No group; the personal desktop applies.
    NoGroup,
    /// Nothing matched; access control and group data disagree.
    Inconsistent,
}

impl GroupResolution {
    /// The hub representation: the group id, `None`, or [`INCONSISTENT_GROUP`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Group(gid) => Value::Text(gid.clone()),
            Self::NoGroup => Value::None,
            Self::Inconsistent => Value::from(INCONSISTENT_GROUP),
        }
    }

    /// Reads the hub representation back.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some(INCONSISTENT_GROUP) => Self::Inconsistent,
            Some(gid) => Self::Group(gid.to_string()),
            None => Self::NoGroup,
        }
    }

    /// The group id, if a group is active.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Group(gid) => Some(gid),
            _ => None,
        }
    }
}

impl From<Option<String>> for GroupResolution {
    fn from(gid: Option<String>) -> Self {
        gid.map_or(Self::NoGroup, Self::Group)
    }
}

/// Selects the active group when the request does not name one.
///
/// `groups` holds the collaborating groups of the context and is consumed
/// as candidates are ruled out. `is_mine` is only asked once the session
/// history is exhausted.
pub fn select_group<M, F>(
    groups: &mut Vec<String>,
    is_folder: bool,
    history: &UniqueStack,
    is_mine: M,
    mut is_member: F,
) -> Result<GroupResolution, HubError>
where
    M: FnOnce() -> Result<bool, HubError>,
    F: FnMut(&str) -> Result<bool, HubError>,
{
    if is_folder {
        return Ok(groups.pop().into());
    }

    for candidate in history.newest_first() {
        let gid = match candidate.as_deref() {
            None | Some("None") => return Ok(GroupResolution::NoGroup),
            Some(gid) => gid,
        };
        if let Some(pos) = groups.iter().position(|g| g == gid) {
            if is_member(gid)? {
                return Ok(GroupResolution::Group(gid.to_string()));
            }
            groups.remove(pos);
        }
    }

    if is_mine()? {
        return Ok(GroupResolution::NoGroup);
    }

    for gid in groups.iter() {
        if is_member(gid)? {
            return Ok(GroupResolution::Group(gid.clone()));
        }
    }

    Ok(GroupResolution::Inconsistent)
}

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("session", session)
        .register("is_member_of", is_member_of)
        .register("gid", gid)
        .register("group_id", |hub| {
            let raw = hub.context().request().form_value("group_id").unwrap_or("");
            Ok(Value::from(group_id_from_form(raw)))
        })
        .register("group_title", |hub| group_title(hub, "gid"))
        .register("managed_group_title", |hub| group_title(hub, "group_id"))
}

fn session(hub: &DerivedHub) -> Result<Value, HubError> {
    let store = hub.tools().require::<dyn SessionStore>("session_data_manager")?;
    Ok(Value::Handle(Handle::new(store)))
}

/// Proxy `group id -> bool` for the logged in user; always false for
/// anonymous requests.
fn is_member_of(hub: &DerivedHub) -> Result<Value, HubError> {
    let Some(user_id) = hub.get_opt_str("user_id")? else {
        return Ok(Value::handle(FlagProxy::by_key(|_| Ok(false))));
    };
    let membership = hub.tools().require::<dyn Membership>("portal_membership")?;
    let proxy = FlagProxy::by_key(move |gid| Ok(membership.is_member_of(&user_id, gid)));
    Ok(Value::handle(proxy))
}

fn gid(hub: &DerivedHub) -> Result<Value, HubError> {
    let session = hub
        .capability::<dyn SessionStore>("session")?
        .ok_or_else(|| HubError::type_mismatch("session", "a session store"))?;
    let key = hub.config().desktop_groups_session_key.as_str();
    let raw = session.get(key);
    let mut history = UniqueStack::from_json(raw.as_ref());

    if let Some(requested) = hub.context().request().form_value("gid") {
        let gid = group_id_from_form(requested);
        if history.push(gid.clone()) {
            let updated = history.to_json();
            debug!(key, history = %updated, "Storing group history");
            session.set(key, updated);
        }
        return Ok(Value::from(gid));
    }

    let mut groups: Vec<String> = hub
        .get("cooperating_groups")?
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|g| g.as_str().map(str::to_string))
        .collect();
    let is_folder = hub.get_str("portal_type")? == FOLDER_TYPE;
    let membership = hub.proxy::<str, String, bool>("is_member_of")?;

    let resolution = select_group(
        &mut groups,
        is_folder,
        &history,
        || hub.get_bool("is_mine"),
        |gid| membership.get(gid),
    )?;

    if resolution == GroupResolution::Inconsistent {
        error!(
            content = %hub.content().id(),
            user_id = ?hub.get_opt_str("user_id").ok().flatten(),
            "No collaboration group found for a reachable object"
        );
    }
    Ok(resolution.to_value())
}

fn group_title(hub: &DerivedHub, source: &str) -> Result<Value, HubError> {
    let Some(gid) = hub.get_opt_str(source)? else {
        return Ok(Value::None);
    };
    let groups = hub.tools().require::<dyn GroupDirectory>("portal_groups")?;
    Ok(Value::from(groups.group_title(&gid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn never_mine() -> Result<bool, HubError> {
        Ok(false)
    }

    #[test]
    fn test_folder_pops_last_group() {
        let mut groups = vec!["g1".to_string(), "g2".to_string()];

        let result = select_group(&mut groups, true, &UniqueStack::new(), never_mine, |_| {
            panic!("membership must not be checked for folders")
        })
        .unwrap();

        assert_eq!(result, GroupResolution::Group("g2".to_string()));
        assert_eq!(groups, vec!["g1".to_string()]);
    }

    #[test]
    fn test_empty_folder_has_no_group() {
        let mut groups = Vec::new();
        let result = select_group(&mut groups, true, &UniqueStack::new(), never_mine, |_| Ok(true));
        assert_eq!(result.unwrap(), GroupResolution::NoGroup);
    }

    #[test]
    fn test_history_sentinel_stops_scan() {
        let history = UniqueStack::from_json(Some(&json!(["g1", null])));
        let mut groups = vec!["g1".to_string()];

        let result = select_group(&mut groups, false, &history, never_mine, |_| Ok(true)).unwrap();
        assert_eq!(result, GroupResolution::NoGroup);
    }

    #[test]
    fn test_history_prefers_recent_membership() {
        let history = UniqueStack::from_json(Some(&json!(["g1", "g2", "g3"])));
        let mut groups = vec!["g1".to_string(), "g2".to_string()];

        // g3 is not a collaborating group, g2 is one the user left.
        let result =
            select_group(&mut groups, false, &history, never_mine, |gid| Ok(gid == "g1")).unwrap();

        assert_eq!(result, GroupResolution::Group("g1".to_string()));
        assert_eq!(groups, vec!["g1".to_string()]);
    }

    #[test]
    fn test_personal_ownership_wins_over_groups() {
        let mut groups = vec!["g1".to_string()];
        let result = select_group(&mut groups, false, &UniqueStack::new(), || Ok(true), |_| Ok(true));
        assert_eq!(result.unwrap(), GroupResolution::NoGroup);
    }

    #[test]
    fn test_inconsistent_when_nothing_matches() {
        let mut groups = vec!["g1".to_string()];
        let result =
            select_group(&mut groups, false, &UniqueStack::new(), never_mine, |_| Ok(false)).unwrap();

        assert_eq!(result, GroupResolution::Inconsistent);
        assert_eq!(result.to_value(), Value::from("ERROR"));
        assert_eq!(GroupResolution::from_value(&result.to_value()), result);
    }

    #[test]
    fn test_membership_errors_propagate() {
        let mut groups = vec!["g1".to_string()];
        let result = select_group(&mut groups, false, &UniqueStack::new(), never_mine, |_| {
            Err(HubError::configuration("membership offline"))
        });
        assert!(result.is_err());
    }
}
