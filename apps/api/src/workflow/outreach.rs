use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::employer::OutreachAssets;

/// Generated outreach per employer name. A build always overwrites the
/// previous entry; no history is kept and nothing is evicted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutreachCache {
    entries: BTreeMap<String, OutreachAssets>,
}

impl OutreachCache {
    /// Stores `assets` for `employer`, returning the bundle it replaced.
    pub fn store(&mut self, employer: &str, assets: OutreachAssets) -> Option<OutreachAssets> {
        self.entries.insert(employer.to_string(), assets)
    }

    pub fn get(&self, employer: &str) -> Option<&OutreachAssets> {
        self.entries.get(employer)
    }

    #[cfg(test)]
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
    use crate::models::employer::fixtures::assets;

    #[test]
    fn test_second_build_replaces_first() {
        let mut cache = OutreachCache::default();
        assert!(cache.store("Acme", assets("v1")).is_none());
        let replaced = cache.store("Acme", assets("v2"));

        assert_eq!(replaced, Some(assets("v1")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("Acme"), Some(&assets("v2")));
    }

    #[test]
    fn test_entries_are_per_employer() {
        let mut cache = OutreachCache::default();
        cache.store("Acme", assets("a"));
        cache.store("Globex", assets("g"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("Globex").unwrap().primary_email, "Hello from g");
    }
}
