use std::collections::BTreeMap;

use serde::Deserialize;

use crate::constants::filter::WILDCARD_ACTION;
use crate::reference::TransformerReference;

/// Transformer references keyed by action id, with `"*"` matching any other action.
///
/// # Examples
///
/// ```
/// use transform_filter::actions::ActionTransformerMap;
/// use transform_filter::reference::TransformerReference;
///
/// let actions = ActionTransformerMap::from([("update", "A"), ("*", "B")]);
/// assert_eq!(actions.get("update"), Some(&TransformerReference::from("A")));
/// assert_eq!(actions.get("delete"), Some(&TransformerReference::from("B")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ActionTransformerMap {
    entries: BTreeMap<String, TransformerReference>,
}

impl ActionTransformerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<TransformerReference>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert<K: Into<String>, V: Into<TransformerReference>>(&mut self, action: K, reference: V) {
        self.entries.insert(action.into(), reference.into());
    }

    /// Returns the reference for the action, falling back to the wildcard entry.
    /// An explicit entry always wins over the wildcard.
    pub fn get(&self, action_id: &str) -> Option<&TransformerReference> {
        self.entries
            .get(action_id)
            .or_else(|| self.entries.get(WILDCARD_ACTION))
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.entries.contains_key(action_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_entry_wins_over_wildcard() {
        let actions = ActionTransformerMap::from([("update", "A"), ("*", "B")]);
        assert_eq!(actions.get("update"), Some(&TransformerReference::from("A")));
        assert_eq!(actions.get("delete"), Some(&TransformerReference::from("B")));
    }

    #[test]
    fn test_no_wildcard() {
        let actions = ActionTransformerMap::from([("view", "A")]);
        assert_eq!(actions.get("index"), None);
        assert!(actions.contains("view"));
        assert!(!actions.contains("*"));
    }

    #[test]
    fn test_explicit_absent_entry_is_kept() {
        let mut actions = ActionTransformerMap::from([("*", "B")]);
        actions.insert("raw", TransformerReference::Absent);
        assert_eq!(actions.get("raw"), Some(&TransformerReference::Absent));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_empty_map() {
        let actions = ActionTransformerMap::new();
        assert!(actions.is_empty());
        assert_eq!(actions.get("index"), None);
    }
}
