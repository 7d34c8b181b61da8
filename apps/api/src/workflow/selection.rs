use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::employer::EmployerMatch;

/// Employer names picked for campaign building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    names: BTreeSet<String>,
}

impl SelectionSet {
    /// Selects every candidate in `matches`.
    pub fn all_of(matches: &[EmployerMatch]) -> Self {
        Self {
            names: matches.iter().map(|m| m.name.clone()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Flips membership of `name`; returns whether it is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    /// Clears the selection if it already equals the whole candidate set,
    /// otherwise selects every candidate.
    pub fn toggle_all(&mut self, matches: &[EmployerMatch]) {
        let full = Self::all_of(matches);
        if *self == full {
            self.names.clear();
        } else {
            *self = full;
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Matches that are selected, in match order.
    pub fn filter<'a>(&'a self, matches: &'a [EmployerMatch]) -> impl Iterator<Item = &'a EmployerMatch> {
        matches.iter().filter(|m| self.contains(&m.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employer::fixtures::employer;

    fn five() -> Vec<EmployerMatch> {
        ["Acme", "Globex", "Initech", "Umbrella", "Hooli"]
            .into_iter()
            .map(employer)
            .collect()
    }

    #[test]
    fn test_toggle_all_clears_full_selection() {
        let matches = five();
        let mut sel = SelectionSet::all_of(&matches);
        assert_eq!(sel.len(), 5);
        sel.toggle_all(&matches);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_everything_from_empty() {
        let matches = five();
        let mut sel = SelectionSet::default();
        sel.toggle_all(&matches);
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn test_toggle_all_from_partial_selects_all() {
        let matches = five();
        let mut sel = SelectionSet::default();
        sel.toggle("Acme");
        sel.toggle_all(&matches);
        assert_eq!(sel, SelectionSet::all_of(&matches));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut sel = SelectionSet::default();
        assert!(sel.toggle("Acme"));
        assert!(sel.contains("Acme"));
        assert!(!sel.toggle("Acme"));
        assert!(!sel.contains("Acme"));
    }

    #[test]
    fn test_filter_keeps_match_order() {
        let matches = five();
        let mut sel = SelectionSet::default();
        sel.toggle("Hooli");
        sel.toggle("Globex");
        let names: Vec<_> = sel.filter(&matches).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Globex", "Hooli"]);
    }
}
