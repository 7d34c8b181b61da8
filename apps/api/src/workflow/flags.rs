use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

/// Per-key single-flight markers. Operations on different keys never block
/// each other; a second start on an active key is refused.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct InFlight<K: Eq + Hash> {
    active: HashSet<K>,
}

impl<K: Eq + Hash> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            active: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    /// Marks `key` active. Returns false if it already was.
    pub fn try_begin(&mut self, key: K) -> bool {
        self.active.insert(key)
    }

    pub fn finish(&mut self, key: &K) {
        self.active.remove(key);
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.active.iter()
    }
}

/// Long-running whole-session operations surfaced through the global
/// loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Enhance,
    Discovery,
    LinkedinBatch,
}
