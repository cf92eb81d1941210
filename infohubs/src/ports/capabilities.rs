//! Site capabilities reached through resolver hub names.
//!
//! Each trait is stored in the environment as an `Arc<dyn Trait>` handle and
//! read back with [`Handle::capability`](crate::core::Handle::capability).

use crate::context::{Brain, BrainRef, ContentRef};

/// Portal-wide state, looked up as `plone_portal_state`.
pub trait PortalState: Send + Sync {
    /// The language of the current request.
    fn language(&self) -> Option<String>;

    /// The portal root object.
    fn portal(&self) -> ContentRef;

    /// The active component site; the portal unless a subsite is active.
    fn site(&self) -> ContentRef {
        self.portal()
    }
}

/// Per-context view state, looked up as `plone_context_state`.
pub trait ContextState: Send + Sync {
    /// Returns true if the published template is the default view.
    fn is_view_template(&self) -> bool;

    /// The id of the view template.
    fn view_template_id(&self) -> String;

    /// The URL of the view.
    fn view_url(&self) -> String;
}

/// Property sheets, looked up as `portal_properties`.
pub trait PropertySheets: Send + Sync {
    /// Reads a property of a sheet.
    fn property(&self, sheet: &str, name: &str) -> Option<String>;
}

/// Book detection, looked up as the `book` browser.
pub trait BookCapability: Send + Sync {
    /// Returns true if the brain belongs to a book.
    fn is_book(&self, brain: Option<&dyn Brain>) -> bool;
}

/// Presentation detection, looked up as the `presentation` browser.
pub trait PresentationCapability: Send + Sync {
    /// Returns true if the object with this UID is a presentation.
    fn is_presentation(&self, uid: Option<&str>) -> bool;
}

/// Structure folders, looked up as the `structuretype` browser.
pub trait StructureCapability: Send + Sync {
    /// The enclosing structure folder of a brain.
    fn structure_folder(&self, brain: Option<&dyn Brain>) -> Option<BrainRef>;
}

/// Structure numbers of book chapters, looked up as `structurenumber`.
pub trait StructureNumbers: Send + Sync {
    /// The structure number of the object with this UID.
    fn number_for(&self, uid: Option<&str>) -> Option<i64>;
}

/// Export profiles, looked up as the `export` browser.
pub trait ExportProfiles: Send + Sync {
    /// The raw profile data.
    fn raw_profile(&self, profile_id: &str) -> Option<serde_json::Value>;

    /// The profile title.
    fn profile_title(&self, profile_id: &str) -> Option<String>;
}
