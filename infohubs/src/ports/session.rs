//! Per-user session storage.

/// Session data of the current user.
///
/// Unlike the hubs, the session outlives the request; it is the only state
/// the hubs write to.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Reads a session value.
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Writes a session value.
    fn set(&self, key: &str, value: serde_json::Value);
}
