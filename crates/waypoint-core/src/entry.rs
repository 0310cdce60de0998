//! Entry state stored at one position of the navigation log.

use crate::persistent::List;
use serde::{Deserialize, Serialize};

/// Payload attached to one position in the host's back/forward log.
///
/// Serialized as `{ "stack": [...], "isTransient": true }`. Both fields are
/// optional on the way in: a payload that is missing `stack`, or that is not
/// an entry at all, comes back as an empty, regular entry rather than an error.
///
/// A transient entry is a waypoint written while dropping the top of the
/// stack. It exists only to be skipped over and is never reported as the
/// current stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryState<T> {
    /// Ordered stack of application values
    #[serde(default = "List::new")]
    pub stack: List<T>,
    /// Whether this entry must be skipped during navigation
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_transient: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl<T> EntryState<T> {
    /// A regular entry holding `stack`.
    pub fn new(stack: impl Into<List<T>>) -> Self {
        Self {
            stack: stack.into(),
            is_transient: false,
        }
    }

    /// A transient waypoint holding `stack`.
    pub fn transient(stack: impl Into<List<T>>) -> Self {
        Self {
            stack: stack.into(),
            is_transient: true,
        }
    }

    /// Map an absent entry (the host's initial, stateless position) to an
    /// empty regular entry.
    pub fn normalize(entry: Option<Self>) -> Self {
        entry.unwrap_or_default()
    }

    /// Number of values on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<T> Default for EntryState<T> {
    fn default() -> Self {
        Self {
            stack: List::new(),
            is_transient: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_regular_entry_omits_transient_flag() {
        let entry = EntryState::new(["alpha".to_string()]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({ "stack": ["alpha"] }));
    }

    #[test]
    fn test_transient_entry_uses_camel_case() {
        let entry = EntryState::transient(["alpha".to_string()]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({ "stack": ["alpha"], "isTransient": true }));
    }

    #[test]
    fn test_missing_stack_normalizes_to_empty() {
        let entry: EntryState<String> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(entry, EntryState::default());

        let entry: EntryState<String> =
            serde_json::from_value(json!({ "isTransient": true })).unwrap();
        assert!(entry.stack.is_empty());
        assert!(entry.is_transient);
    }

    #[test]
    fn test_normalize_absent_entry() {
        let entry: EntryState<u8> = EntryState::normalize(None);
        assert_eq!(entry.depth(), 0);
        assert!(!entry.is_transient);
    }
}
