//! Configuration for hub construction.
//!
//! A [`HubConfig`] is loaded once at startup and turned into the immutable
//! tables (strategy table, tool detector, factory registry) that every cache
//! pair shares.

use crate::errors::HubError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Settings for the tool-name heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDetectorConfig {
    /// Names that are always tools, in addition to the alias targets.
    #[serde(default)]
    pub known: Vec<String>,
    /// Tool name prefixes.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Tool name suffixes.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    /// Whether dashed names may still be tools.
    #[serde(default)]
    pub allow_dashes: bool,
}

fn default_prefixes() -> Vec<String> {
    vec!["plone_".to_string(), "portal_".to_string()]
}

fn default_suffixes() -> Vec<String> {
    vec![
        "_catalog".to_string(),
        "_registry".to_string(),
        "_tool".to_string(),
    ]
}

impl Default for ToolDetectorConfig {
    fn default() -> Self {
        Self {
            known: Vec::new(),
            prefixes: default_prefixes(),
            suffixes: default_suffixes(),
            allow_dashes: false,
        }
    }
}

/// Configuration for building cache pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Short names resolved as tools, e.g. `pc` → `portal_catalog`.
    #[serde(default = "default_tool_aliases")]
    pub tool_aliases: BTreeMap<String, String>,
    /// Tool-name heuristic.
    #[serde(default)]
    pub tool_detector: ToolDetectorConfig,
    /// Names ending with this suffix are views.
    #[serde(default = "default_view_suffix")]
    pub view_suffix: String,
    /// Session key holding the desktop group stack.
    #[serde(default = "default_groups_session_key")]
    pub desktop_groups_session_key: String,
    /// `strftime` format of the per-request timestamp.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// UID of the personal desktop object, if the site has one.
    #[serde(default)]
    pub desktop_uid: Option<String>,
    /// Default for bracket rendering.
    #[serde(default)]
    pub bracket_default: bool,
    /// Whether the site runs in development mode.
    #[serde(default)]
    pub dev_mode: bool,
    /// Prefix accepted (and ignored) by `named_width` lookups.
    #[serde(default = "default_image_size_prefix")]
    pub image_size_prefix: String,
}

fn default_tool_aliases() -> BTreeMap<String, String> {
    [
        ("acl", "acl_users"),
        ("ctr", "content_type_registry"),
        ("mr", "mimetype_registry"),
        ("pa", "portal_actions"),
        ("pc", "portal_catalog"),
        ("pg", "portal_groups"),
        ("pl", "portal_languages"),
        ("pm", "portal_membership"),
        ("pr", "portal_registration"),
        ("pt", "portal_types"),
        ("ptr", "portal_transforms"),
        ("puc", "portal_user_catalog"),
        ("pu", "plone_utils"),
        ("pw", "portal_workflow"),
        ("rc", "reference_catalog"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_view_suffix() -> String {
    "view".to_string()
}

fn default_groups_session_key() -> String {
    "desktop_groups".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d_%H%M%S".to_string()
}

fn default_image_size_prefix() -> String {
    "image_".to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            tool_aliases: default_tool_aliases(),
            tool_detector: ToolDetectorConfig::default(),
            view_suffix: default_view_suffix(),
            desktop_groups_session_key: default_groups_session_key(),
            timestamp_format: default_timestamp_format(),
            desktop_uid: None,
            bracket_default: false,
            dev_mode: false,
            image_size_prefix: default_image_size_prefix(),
        }
    }
}

impl HubConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, HubError> {
        serde_json::from_str(json).map_err(|e| HubError::Config(e.to_string()))
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HubError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Adds or replaces a tool alias.
    #[must_use]
    pub fn with_tool_alias(mut self, alias: impl Into<String>, tool: impl Into<String>) -> Self {
        self.tool_aliases.insert(alias.into(), tool.into());
        self
    }

    /// Sets the personal desktop UID.
    #[must_use]
    pub fn with_desktop_uid(mut self, uid: impl Into<String>) -> Self {
        self.desktop_uid = Some(uid.into());
        self
    }

    /// Sets development mode.
    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Sets the timestamp format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Sets the session key of the desktop group stack.
    #[must_use]
    pub fn with_groups_session_key(mut self, key: impl Into<String>) -> Self {
        self.desktop_groups_session_key = key.into();
        self
    }
}
