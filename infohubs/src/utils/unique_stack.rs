//! Ordered set of recently used group ids, persisted in the session.

use serde_json::Value as Json;

/// An ordered set, most recent entry last.
///
/// `None` stands for "no group" and is a regular member of the stack.
/// Pushing a value that is already present moves it to the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueStack {
    items: Vec<Option<String>>,
}

impl UniqueStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a stack from its session representation.
    ///
    /// Anything other than an array is treated as an empty stack; `null`
    /// and the string `"None"` both load as the "no group" entry.
    #[must_use]
    pub fn from_json(raw: Option<&Json>) -> Self {
        let mut stack = Self::new();
        if let Some(Json::Array(items)) = raw {
            for item in items {
                let entry = match item {
                    Json::String(s) if s != "None" => Some(s.clone()),
                    Json::String(_) | Json::Null => None,
                    other => Some(other.to_string()),
                };
                stack.push(entry);
            }
        }
        stack
    }

    /// Returns the session representation.
    #[must_use]
    pub fn to_json(&self) -> Json {
        Json::Array(
            self.items
                .iter()
                .map(|item| item.as_ref().map_or(Json::Null, |s| Json::String(s.clone())))
                .collect(),
        )
    }

    /// Pushes `item` to the top and reports whether the content changed.
    pub fn push(&mut self, item: Option<String>) -> bool {
        if self.items.last() == Some(&item) {
            return false;
        }
        self.items.retain(|existing| existing != &item);
        self.items.push(item);
        true
    }

    /// The most recent entry.
    #[must_use]
    pub fn top(&self) -> Option<&Option<String>> {
        self.items.last()
    }

    /// Iterates from the most recent entry to the oldest.
    pub fn newest_first(&self) -> impl Iterator<Item = &Option<String>> {
        self.items.iter().rev()
    }

    /// Returns the entries, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<String>] {
        &self.items
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the stack has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_push_moves_to_top() {
        let mut stack = UniqueStack::new();
        assert!(stack.push(Some("a".into())));
        assert!(stack.push(Some("b".into())));
        assert!(stack.push(Some("a".into())));

        assert_eq!(stack.as_slice(), &[Some("b".to_string()), Some("a".to_string())]);
    }

    #[test]
    fn test_push_top_is_unchanged() {
        let mut stack = UniqueStack::new();
        stack.push(None);
        assert!(!stack.push(None));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_json_roundtrip_with_sentinels() {
        let stack = UniqueStack::from_json(Some(&json!(["g1", null, "None", "g2"])));

        assert_eq!(stack.as_slice(), &[Some("g1".to_string()), None, Some("g2".to_string())]);
        assert_eq!(stack.to_json(), json!(["g1", null, "g2"]));
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(UniqueStack::from_json(Some(&json!("g1"))).is_empty());
        assert!(UniqueStack::from_json(None).is_empty());
    }
}
