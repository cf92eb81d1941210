//! Ports - interfaces of the external collaborators.
//!
//! The hubs never talk to the hosting framework directly. Everything goes
//! through these traits:
//! - `Environment` for tool, adapter, view and browser lookup
//! - `SearchIndex`, `SessionStore` and `Membership`
//! - capability traits stored behind resolver hub names

mod capabilities;
mod catalog;
mod environment;
mod membership;
mod session;

pub use capabilities::{
    BookCapability, ContextState, ExportProfiles, PortalState, PresentationCapability,
    PropertySheets, StructureCapability, StructureNumbers,
};
pub use catalog::SearchIndex;
pub use environment::Environment;
pub use membership::{AuthorDirectory, AuthorProfile, GroupDirectory, Member, Membership};
pub use session::SessionStore;

#[cfg(test)]
pub(crate) use catalog::MockSearchIndex;
#[cfg(test)]
pub(crate) use membership::MockMembership;
#[cfg(test)]
pub(crate) use session::MockSessionStore;
