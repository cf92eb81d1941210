//! Users, groups and permissions.

use crate::context::Context;
use serde::{Deserialize, Serialize};

/// An authenticated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The user id.
    pub id: String,
    /// The display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

impl Member {
    /// Creates a member with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fullname: None,
        }
    }
}

/// An author profile attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// The user id the profile belongs to.
    pub user_id: String,
    /// The contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The membership tool, looked up as `portal_membership`.
#[cfg_attr(test, mockall::automock)]
pub trait Membership: Send + Sync {
    /// Returns true if nobody is logged in.
    fn is_anonymous(&self) -> bool;

    /// Returns the logged in member.
    fn authenticated_member(&self) -> Option<Member>;

    /// Returns true if `user_id` belongs to `group_id`.
    fn is_member_of(&self, user_id: &str, group_id: &str) -> bool;

    /// Returns true if the current user has `permission` on the context.
    fn check_permission(&self, permission: &str, context: &Context) -> bool;
}

/// Group metadata, looked up as `portal_groups`.
pub trait GroupDirectory: Send + Sync {
    /// Returns the title of a group.
    fn group_title(&self, group_id: &str) -> Option<String>;
}

/// Author profiles, looked up as the `author` browser.
pub trait AuthorDirectory: Send + Sync {
    /// Returns the profile of a user.
    fn by_user_id(&self, user_id: &str) -> Option<AuthorProfile>;
}
