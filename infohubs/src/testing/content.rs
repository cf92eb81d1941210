//! In-memory content objects and catalog brains.

use crate::context::{Brain, Content, ContentRef, TranslationMap};
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Arc;

/// A content object with fixed attributes.
#[derive(Debug, Clone)]
pub struct StaticContent {
    id: String,
    portal_type: String,
    uid: Option<String>,
    title: String,
    path: String,
    creator: Option<String>,
    groups: Result<Vec<String>, String>,
    language: Option<String>,
    translations: Option<Result<TranslationMap, String>>,
    canonical: Option<ContentRef>,
    children: HashMap<String, ContentRef>,
}

impl StaticContent {
    /// Creates an object at `/plone/<id>`.
    #[must_use]
    pub fn new(id: impl Into<String>, portal_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: format!("/plone/{id}"),
            id,
            portal_type: portal_type.into(),
            uid: None,
            title: String::new(),
            creator: None,
            groups: Ok(Vec::new()),
            language: None,
            translations: None,
            canonical: None,
            children: HashMap::new(),
        }
    }

    /// Sets the UID.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the physical path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the creator.
    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Sets the collaborating groups.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Ok(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Makes reading the collaborating groups fail.
    #[must_use]
    pub fn with_groups_error(mut self, message: impl Into<String>) -> Self {
        self.groups = Err(message.into());
        self
    }

    /// Sets the language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the full translation map.
    #[must_use]
    pub fn with_translations(mut self, translations: TranslationMap) -> Self {
        self.translations = Some(Ok(translations));
        self
    }

    /// Adds one translation.
    #[must_use]
    pub fn with_translation(mut self, language: impl Into<String>, object: ContentRef) -> Self {
        let mut translations = match self.translations.take() {
            Some(Ok(translations)) => translations,
            _ => TranslationMap::new(),
        };
        translations.entry(language.into()).or_default().push(object);
        self.translations = Some(Ok(translations));
        self
    }

    /// Makes the translation lookup fail.
    #[must_use]
    pub fn with_translations_error(mut self, message: impl Into<String>) -> Self {
        self.translations = Some(Err(message.into()));
        self
    }

    /// Sets the canonical object.
    #[must_use]
    pub fn with_canonical(mut self, canonical: ContentRef) -> Self {
        self.canonical = Some(canonical);
        self
    }

    /// Makes `object` reachable by traversing `path` from this object.
    #[must_use]
    pub fn with_child(mut self, path: impl Into<String>, object: ContentRef) -> Self {
        self.children.insert(path.into(), object);
        self
    }
}

impl Content for StaticContent {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn uid(&self) -> Option<String> {
        self.uid.clone()
    }

    fn portal_type(&self) -> String {
        self.portal_type.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn absolute_url(&self) -> String {
        format!("http://nohost{}", self.path)
    }

    fn absolute_url_path(&self) -> String {
        self.path.clone()
    }

    fn creator(&self) -> Option<String> {
        self.creator.clone()
    }

    fn collaborating_groups(&self) -> anyhow::Result<Vec<String>> {
        self.groups.clone().map_err(|message| anyhow!(message))
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn translations(&self) -> Option<anyhow::Result<TranslationMap>> {
        self.translations
            .as_ref()
            .map(|translations| translations.clone().map_err(|message| anyhow!(message)))
    }

    fn canonical(&self) -> Option<anyhow::Result<ContentRef>> {
        self.canonical.as_ref().map(|canonical| Ok(Arc::clone(canonical)))
    }

    fn restricted_traverse(&self, path: &str) -> anyhow::Result<ContentRef> {
        self.children
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{path:?} not found below {}", self.id))
    }
}

/// A catalog record pointing at an optional object.
#[derive(Debug, Clone)]
pub struct StaticBrain {
    uid: String,
    path: String,
    object: Option<ContentRef>,
}

impl StaticBrain {
    /// Creates a brain without an object.
    #[must_use]
    pub fn new(uid: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            path: path.into(),
            object: None,
        }
    }

    /// Creates a brain for `object`, taking UID and path from it.
    #[must_use]
    pub fn of(object: ContentRef) -> Self {
        Self {
            uid: object.uid().unwrap_or_default(),
            path: object.absolute_url_path(),
            object: Some(object),
        }
    }

    /// Sets the object.
    #[must_use]
    pub fn with_object(mut self, object: ContentRef) -> Self {
        self.object = Some(object);
        self
    }
}

impl Brain for StaticBrain {
    fn uid(&self) -> String {
        self.uid.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn url(&self) -> String {
        format!("http://nohost{}", self.path)
    }

    fn object(&self) -> anyhow::Result<ContentRef> {
        self.object
            .clone()
            .ok_or_else(|| anyhow!("object {} is gone", self.uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_content_defaults() {
        let content = StaticContent::new("doc", "Document").with_uid("u1");

        assert_eq!(content.absolute_url_path(), "/plone/doc");
        assert_eq!(content.absolute_url(), "http://nohost/plone/doc");
        assert_eq!(content.uid().as_deref(), Some("u1"));
        assert!(content.translations().is_none());
        assert!(content.restricted_traverse("x").is_err());
    }

    #[test]
    fn test_brain_of_object() {
        let object: ContentRef = Arc::new(StaticContent::new("doc", "Document").with_uid("u1"));
        let brain = StaticBrain::of(object);

        assert_eq!(brain.uid(), "u1");
        assert_eq!(brain.path(), "/plone/doc");
        assert!(brain.object().is_ok());
        assert!(StaticBrain::new("u2", "/plone/gone").object().is_err());
    }
}
