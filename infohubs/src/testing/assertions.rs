//! Test assertions for hub entries.

use crate::core::{ResolutionState, Value};
use crate::hubs::DerivedHub;

/// Asserts that `name` has been resolved.
pub fn assert_resolved(hub: &DerivedHub, name: &str) {
    assert_eq!(
        hub.state(name),
        ResolutionState::Resolved,
        "Expected '{}' to be resolved. Resolved: {:?}",
        name,
        hub.resolved_names()
    );
}

/// Asserts that `name` has not been resolved (or its resolution failed).
pub fn assert_unresolved(hub: &DerivedHub, name: &str) {
    assert_eq!(
        hub.state(name),
        ResolutionState::Unresolved,
        "Expected '{}' to be unresolved. Resolved: {:?}",
        name,
        hub.resolved_names()
    );
}

/// Asserts that the fact `name` resolves to `expected`.
pub fn assert_fact_eq(hub: &DerivedHub, name: &str, expected: impl Into<Value>) {
    let expected = expected.into();
    match hub.get(name) {
        Ok(actual) => assert_eq!(actual, expected, "Unexpected value for '{name}'"),
        Err(err) => panic!("Expected '{name}' to resolve to {expected:?}, got error: {err}"),
    }
}
