//! Naming heuristic that recognizes tool names.

use crate::config::ToolDetectorConfig;
use std::collections::HashSet;

/// Returns true if `name` looks like the name of a tool.
///
/// Rules, first match wins:
/// 1. `name` is in `known` → tool.
/// 2. dashes are disallowed and `name` contains one → not a tool.
/// 3. `name` starts with one of `prefixes` → tool.
/// 4. `name` ends with one of `suffixes` → tool.
/// 5. otherwise → not a tool.
#[must_use]
pub fn classify<S: AsRef<str>>(
    name: &str,
    known: &HashSet<String>,
    prefixes: &[S],
    suffixes: &[S],
    allow_dashes: bool,
) -> bool {
    if known.contains(name) {
        return true;
    }
    if !allow_dashes && name.contains('-') {
        return false;
    }
    prefixes.iter().any(|p| name.starts_with(p.as_ref()))
        || suffixes.iter().any(|s| name.ends_with(s.as_ref()))
}

/// A configured tool-name detector.
#[derive(Debug, Clone, Default)]
pub struct ToolDetector {
    known: HashSet<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    allow_dashes: bool,
}

impl ToolDetector {
    /// Creates an empty detector; dashes are disallowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a detector from configuration plus additional known names.
    #[must_use]
    pub fn from_config<I, S>(config: &ToolDetectorConfig, extra_known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new()
            .with_known(config.known.iter().cloned())
            .with_known(extra_known)
            .with_prefixes(config.prefixes.iter().cloned())
            .with_suffixes(config.suffixes.iter().cloned())
            .allow_dashes(config.allow_dashes)
    }

    /// Adds names that are always tools.
    #[must_use]
    pub fn with_known<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds tool name prefixes.
    #[must_use]
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Adds tool name suffixes.
    #[must_use]
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Sets whether dashed names may still match prefixes and suffixes.
    #[must_use]
    pub fn allow_dashes(mut self, allow: bool) -> Self {
        self.allow_dashes = allow;
        self
    }

    /// Returns true if `name` looks like a tool.
    #[must_use]
    pub fn is_tool(&self, name: &str) -> bool {
        classify(
            name,
            &self.known,
            &self.prefixes,
            &self.suffixes,
            self.allow_dashes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ToolDetector {
        ToolDetector::new()
            .with_prefixes(["plone_", "portal_"])
            .with_suffixes(["_catalog", "_registry"])
    }

    #[test]
    fn test_prefix_and_suffix() {
        let d = detector();
        assert!(d.is_tool("plone_utils"));
        assert!(d.is_tool("mimetype_registry"));
        assert!(!d.is_tool("book"));
    }

    #[test]
    fn test_dashes_reject_by_default() {
        let d = detector();
        assert!(!d.is_tool("my-silly_registry"));
        assert!(d.clone().allow_dashes(true).is_tool("my-silly_registry"));
    }

    #[test]
    fn test_known_names_win() {
        let d = detector();
        assert!(!d.is_tool("acl_users"));

        let d = d.with_known(["acl_users", "my-silly_registry"]);
        assert!(d.is_tool("acl_users"));
        assert!(d.is_tool("my-silly_registry"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let known = HashSet::new();
        let prefixes = ["portal_"];
        let suffixes = ["_tool"];
        for _ in 0..3 {
            assert!(classify("portal_x", &known, &prefixes, &suffixes, false));
            assert!(!classify("portal-x_tool", &known, &prefixes, &suffixes, false));
            assert!(classify("portal-x_tool", &known, &prefixes, &suffixes, true));
            assert!(!classify("", &known, &prefixes, &suffixes, false));
        }
    }
}
