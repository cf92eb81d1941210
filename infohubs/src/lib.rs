//! # Infohubs
//!
//! Per-request lazy caches for content management front-ends.
//!
//! For every published object two caches are built:
//!
//! - **`ResolverHub`**: looks up tools, adapters, views and browser views in
//!   the hosting environment, choosing a strategy from the name
//! - **`DerivedHub`**: computes facts (current user, active group, UID
//!   lookups, translations, ...) on first access from registered factories
//! - **Memoized proxies**: parameterized facts such as `has_perm` or
//!   `uid2path` cache every argument they have seen
//! - **Cycle detection**: factories reading each other in a loop fail with
//!   a circular dependency error instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use infohubs::prelude::*;
//! use infohubs::testing::{StaticContent, StaticEnvironment};
//! use std::sync::Arc;
//!
//! // Built once at startup
//! let factory = HubFactory::new(HubConfig::default(), Arc::new(StaticEnvironment::new()));
//!
//! // Once per request
//! let content = StaticContent::new("front-page", "Document").with_uid("abc123");
//! let (_tools, info) = factory.make_hubs(Context::new(Arc::new(content), Request::new()));
//!
//! assert_eq!(info.get_opt_str("my_uid")?.as_deref(), Some("abc123"));
//! # Ok::<(), HubError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod facts;
pub mod hubs;
pub mod observability;
pub mod ports;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{HubConfig, ToolDetectorConfig};
    pub use crate::context::{Brain, BrainRef, Content, ContentRef, Context, Request};
    pub use crate::core::{Handle, ResolutionState, StrategyKind, Value};
    pub use crate::errors::{CircularDependencyError, ErrorInfo, HubError};
    pub use crate::facts::{GroupResolution, INCONSISTENT_GROUP};
    pub use crate::hubs::{
        CallableProxy, DerivedHub, FactoryRegistry, HubFactory, ResolverHub, Strategy,
        StrategyTable, ToolDetector,
    };
    pub use crate::observability::init_tracing;
    pub use crate::ports::{Environment, Membership, SearchIndex, SessionStore};
}
