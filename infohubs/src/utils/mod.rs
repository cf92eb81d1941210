//! Small helpers shared by the hub factories.
//!
//! This module provides:
//! - argument normalization for dictionary-shaped proxy keys
//! - catalog path helpers
//! - the session-persisted unique stack
//! - timestamp formatting

mod timestamps;
mod unique_stack;

pub use timestamps::Timestamper;
pub use unique_stack::UniqueStack;

use std::collections::HashMap;

/// Reduces a dictionary-shaped argument to a canonical key.
///
/// Items are sorted by key and entries without a value are dropped, so two
/// dictionaries with the same non-`None` entries produce the same key.
///
/// ```
/// use infohubs::utils::sorted_nonempty_items;
/// use std::collections::HashMap;
///
/// let mut args = HashMap::new();
/// args.insert("uid".to_string(), Some("abc".to_string()));
/// args.insert("lang".to_string(), None);
/// assert_eq!(sorted_nonempty_items(&args), vec![("uid".to_string(), "abc".to_string())]);
/// ```
#[must_use]
pub fn sorted_nonempty_items(args: &HashMap<String, Option<String>>) -> Vec<(String, String)> {
    let mut items: Vec<(String, String)> = args
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.clone(), v.clone())))
        .collect();
    items.sort();
    items
}

/// Removes the site root segment from an absolute catalog path.
///
/// `/portal/docs/item` becomes `docs/item`. Paths without a site root
/// segment become empty.
#[must_use]
pub fn strip_site_root(path: &str) -> String {
    path.split('/').skip(2).collect::<Vec<_>>().join("/")
}

/// Turns a request-supplied group id into an optional value.
///
/// The literal `"None"` and the empty string both mean "no group". The
/// value is taken as is, without trimming.
#[must_use]
pub fn group_id_from_form(raw: &str) -> Option<String> {
    match raw {
        "" | "None" => None,
        gid => Some(gid.to_string()),
    }
}
