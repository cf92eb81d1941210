//! Search index access.

use crate::context::BrainRef;

/// The catalog, looked up as the `portal_catalog` tool.
#[cfg_attr(test, mockall::automock)]
pub trait SearchIndex: Send + Sync {
    /// Finds the first brain with the given UID the current user may see.
    fn find_by_uid(&self, uid: &str) -> Option<BrainRef>;

    /// Finds all brains with the given UID, ignoring permissions.
    fn unrestricted_find_by_uid(&self, uid: &str) -> Vec<BrainRef>;
}
