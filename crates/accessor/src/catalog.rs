//! View catalog cache
//!
//! Maps finder method names to the view definitions resolved for them. One
//! catalog belongs to exactly one accessor; it is a lookup shortcut, never a
//! source of truth, and only changes when the accessor rebuilds it.

use std::collections::HashMap;
use viewbase_core::ViewDefinition;

/// Finder name → resolved view
#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    views: HashMap<String, ViewDefinition>,
}

impl ViewCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache the view resolved for `finder`, replacing any previous entry
    pub fn insert(&mut self, finder: impl Into<String>, view: ViewDefinition) {
        self.views.insert(finder.into(), view);
    }

    /// Look up the view for `finder`
    pub fn get(&self, finder: &str) -> Option<&ViewDefinition> {
        self.views.get(finder)
    }

    /// True if `finder` has a cached view
    pub fn contains(&self, finder: &str) -> bool {
        self.views.contains_key(finder)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.views.clear();
    }

    /// Cached finder names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.views.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of cached views
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_clear() {
        let mut catalog = ViewCatalog::new();
        catalog.insert("findB", ViewDefinition::new("findB", "m"));
        catalog.insert("findA", ViewDefinition::new("findA", "m"));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("findA"));
        assert_eq!(catalog.get("findB").map(|v| v.name.as_str()), Some("findB"));
        assert_eq!(catalog.names(), vec!["findA".to_string(), "findB".to_string()]);

        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.get("findA").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = ViewCatalog::new();
        catalog.insert("f", ViewDefinition::new("f", "old"));
        catalog.insert("f", ViewDefinition::new("f", "new"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("f").unwrap().map, "new");
    }
}
