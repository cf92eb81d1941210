//! In-memory implementations of the collaborator ports.

use crate::context::{BrainRef, Context, ContentRef};
use crate::ports::{
    ContextState, Member, Membership, PortalState, PropertySheets, SearchIndex, SessionStore,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A catalog over a fixed set of brains.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    visible: HashMap<String, BrainRef>,
    hidden: HashMap<String, BrainRef>,
    lookups: AtomicUsize,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a brain the current user may see.
    #[must_use]
    pub fn with_brain(mut self, brain: BrainRef) -> Self {
        self.visible.insert(brain.uid(), brain);
        self
    }

    /// Adds a brain only unrestricted searches find.
    #[must_use]
    pub fn with_hidden(mut self, brain: BrainRef) -> Self {
        self.hidden.insert(brain.uid(), brain);
        self
    }

    /// Number of searches run so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl SearchIndex for MemoryCatalog {
    fn find_by_uid(&self, uid: &str) -> Option<BrainRef> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.visible.get(uid).cloned()
    }

    fn unrestricted_find_by_uid(&self, uid: &str) -> Vec<BrainRef> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.visible
            .get(uid)
            .or_else(|| self.hidden.get(uid))
            .cloned()
            .into_iter()
            .collect()
    }
}

/// Session data kept in a map.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, serde_json::Value>>,
    writes: AtomicUsize,
}

impl MemorySession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value.
    #[must_use]
    pub fn with_value(self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.lock().insert(key.into(), value);
        self
    }

    /// Reads a value without counting as a hub access.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().get(key).cloned()
    }

    /// Number of `set` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.value(key)
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values.lock().insert(key.to_string(), value);
    }
}

/// Membership data for a single (possibly anonymous) user.
#[derive(Debug, Default)]
pub struct StaticMembership {
    member: Option<Member>,
    groups: HashSet<String>,
    permissions: HashSet<String>,
    permission_checks: AtomicUsize,
}

impl StaticMembership {
    /// Nobody is logged in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// `user_id` is logged in.
    #[must_use]
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            member: Some(Member::new(user_id)),
            ..Self::default()
        }
    }

    /// Adds the user to a group.
    #[must_use]
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.groups.insert(group_id.into());
        self
    }

    /// Grants a permission on every context.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Number of permission checks so far.
    #[must_use]
    pub fn permission_checks(&self) -> usize {
        self.permission_checks.load(Ordering::SeqCst)
    }
}

impl Membership for StaticMembership {
    fn is_anonymous(&self) -> bool {
        self.member.is_none()
    }

    fn authenticated_member(&self) -> Option<Member> {
        self.member.clone()
    }

    fn is_member_of(&self, user_id: &str, group_id: &str) -> bool {
        self.member.as_ref().is_some_and(|m| m.id == user_id) && self.groups.contains(group_id)
    }

    fn check_permission(&self, permission: &str, _context: &Context) -> bool {
        self.permission_checks.fetch_add(1, Ordering::SeqCst);
        self.permissions.contains(permission)
    }
}

/// Portal state with a fixed language and root.
#[derive(Debug)]
pub struct StaticPortalState {
    language: Option<String>,
    portal: ContentRef,
    site: Option<ContentRef>,
}

impl StaticPortalState {
    /// Creates the portal state for `portal`.
    #[must_use]
    pub fn new(portal: ContentRef) -> Self {
        Self {
            language: None,
            portal,
            site: None,
        }
    }

    /// Sets the request language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Makes `site` the active component site.
    #[must_use]
    pub fn with_site(mut self, site: ContentRef) -> Self {
        self.site = Some(site);
        self
    }
}

impl PortalState for StaticPortalState {
    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn portal(&self) -> ContentRef {
        Arc::clone(&self.portal)
    }

    fn site(&self) -> ContentRef {
        Arc::clone(self.site.as_ref().unwrap_or(&self.portal))
    }
}

/// Context state with fixed answers.
#[derive(Debug, Clone)]
pub struct StaticContextState {
    /// Whether the default view is published.
    pub is_view_template: bool,
    /// The view template id.
    pub view_template_id: String,
    /// The view URL.
    pub view_url: String,
}

impl ContextState for StaticContextState {
    fn is_view_template(&self) -> bool {
        self.is_view_template
    }

    fn view_template_id(&self) -> String {
        self.view_template_id.clone()
    }

    fn view_url(&self) -> String {
        self.view_url.clone()
    }
}

/// Property sheets kept in a map.
#[derive(Debug, Default)]
pub struct StaticProperties {
    properties: HashMap<(String, String), String>,
}

impl StaticProperties {
    /// Creates empty sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one property.
    #[must_use]
    pub fn with_property(
        mut self,
        sheet: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.properties
            .insert((sheet.into(), name.into()), value.into());
        self
    }
}

impl PropertySheets for StaticProperties {
    fn property(&self, sheet: &str, name: &str) -> Option<String> {
        self.properties
            .get(&(sheet.to_string(), name.to_string()))
            .cloned()
    }
}
