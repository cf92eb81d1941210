//! The request a context was published by.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request data visible to the hubs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Form variables.
    #[serde(default)]
    pub form: BTreeMap<String, String>,
    /// Request cookies.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Id of the template that renders the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_template: Option<String>,
}

impl Request {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a form variable.
    #[must_use]
    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    /// Adds a cookie.
    #[must_use]
    pub fn with_cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    /// Sets the published template id.
    #[must_use]
    pub fn with_published_template(mut self, template: impl Into<String>) -> Self {
        self.published_template = Some(template.into());
        self
    }

    /// Gets a form variable.
    #[must_use]
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }
}
