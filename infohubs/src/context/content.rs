//! Content objects and catalog brains as seen by the hubs.

use anyhow::anyhow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared pointer to a content object.
pub type ContentRef = Arc<dyn Content>;

/// Shared pointer to a catalog brain.
pub type BrainRef = Arc<dyn Brain>;

/// Language code → translations of an object in that language.
pub type TranslationMap = HashMap<String, Vec<ContentRef>>;

/// A content object of the hosting site.
///
/// Only `id`, `portal_type`, `absolute_url` and `absolute_url_path` are
/// required; everything else defaults to "not supported".
pub trait Content: Send + Sync + fmt::Debug {
    /// The object id (last path segment).
    fn id(&self) -> String;

    /// The stable unique identifier, if the object supports identification.
    fn uid(&self) -> Option<String> {
        None
    }

    /// The content type name, e.g. `"Folder"`.
    fn portal_type(&self) -> String;

    /// The object title.
    fn title(&self) -> String {
        String::new()
    }

    /// The public URL.
    fn absolute_url(&self) -> String;

    /// The URL path, without scheme and host.
    fn absolute_url_path(&self) -> String;

    /// The user id of the creator.
    fn creator(&self) -> Option<String> {
        None
    }

    /// Ids of the groups collaborating on this object.
    fn collaborating_groups(&self) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// The object language; `None` for language-neutral objects.
    fn language(&self) -> Option<String> {
        None
    }

    /// Translations of this object, if the object is translatable.
    ///
    /// An `Err` reports a broken back-reference lookup.
    fn translations(&self) -> Option<anyhow::Result<TranslationMap>> {
        None
    }

    /// The canonical object of a translation group, if supported.
    fn canonical(&self) -> Option<anyhow::Result<ContentRef>> {
        None
    }

    /// Traverses to a descendant, honoring permissions.
    fn restricted_traverse(&self, path: &str) -> anyhow::Result<ContentRef> {
        Err(anyhow!("cannot traverse to {path:?} from {}", self.id()))
    }
}

/// A lightweight catalog record referencing a full object by UID.
pub trait Brain: Send + Sync + fmt::Debug {
    /// The UID of the referenced object.
    fn uid(&self) -> String;

    /// The physical path, starting with the site root segment.
    fn path(&self) -> String;

    /// The public URL of the referenced object.
    fn url(&self) -> String;

    /// Loads the referenced object.
    fn object(&self) -> anyhow::Result<ContentRef>;
}
