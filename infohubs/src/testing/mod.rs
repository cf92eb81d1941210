//! Testing utilities for code built on the hubs.
//!
//! This module provides:
//! - In-memory content objects, brains and collaborators
//! - A recording `StaticEnvironment`
//! - Assertions on hub entries
//! - The `HubFixture` builder for complete hub pairs

mod assertions;
mod collaborators;
mod content;
mod environment;
mod fixtures;

pub use assertions::{assert_fact_eq, assert_resolved, assert_unresolved};
pub use collaborators::{
    MemoryCatalog, MemorySession, StaticContextState, StaticMembership, StaticPortalState,
    StaticProperties,
};
pub use content::{StaticBrain, StaticContent};
pub use environment::StaticEnvironment;
pub use fixtures::HubFixture;
