use std::collections::{HashMap, HashSet};

use rowforge_core::Field;

/// Insertion-ordered set of canonical value keys.
///
/// Used both as the committed per-field tracker and as the local avoid list
/// snapshotted for one retry loop. Order matters: the model strategy names
/// the most recently avoided values in its prompt.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl ValueSet {
    pub fn insert(&mut self, key: String) -> bool {
        if self.seen.insert(key.clone()) {
            self.order.push(key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The last `window` inserted keys, oldest first.
    pub fn recent(&self, window: usize) -> &[String] {
        let start = self.order.len().saturating_sub(window);
        &self.order[start..]
    }

    /// Detached copy for one retry loop; mutations do not reach the
    /// committed tracker.
    pub fn snapshot(&self) -> ValueSet {
        self.clone()
    }
}

/// Per-table arena of uniqueness trackers, one per unique field, owned by a
/// single generation run and discarded with it.
#[derive(Debug, Default)]
pub struct UniqueTrackers {
    fields: HashMap<String, ValueSet>,
}

impl UniqueTrackers {
    pub fn for_table(fields: &[Field]) -> Self {
        let mut trackers = HashMap::new();
        for field in fields {
            if field.is_unique {
                trackers.insert(field.name.clone(), ValueSet::default());
            }
        }
        Self { fields: trackers }
    }

    pub fn field_mut(&mut self, name: &str) -> &mut ValueSet {
        self.fields.entry(name.to_string()).or_default()
    }

    pub fn field(&self, name: &str) -> Option<&ValueSet> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_and_ordered() {
        let mut set = ValueSet::default();
        assert!(set.insert("a".to_string()));
        assert!(set.insert("b".to_string()));
        assert!(!set.insert("a".to_string()));

        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert_eq!(set.recent(10), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn recent_windows_the_tail() {
        let mut set = ValueSet::default();
        for i in 0..30 {
            set.insert(format!("v{i}"));
        }

        let recent = set.recent(20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent.first().map(String::as_str), Some("v10"));
        assert_eq!(recent.last().map(String::as_str), Some("v29"));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut tracker = ValueSet::default();
        tracker.insert("committed".to_string());

        let mut avoid = tracker.snapshot();
        avoid.insert("local".to_string());

        assert!(avoid.contains("committed"));
        assert!(!tracker.contains("local"));
        assert_eq!(tracker.len(), 1);
    }
}
