//! Finder declarations
//!
//! A finder is a named query backed by a server-side view. Callers declare
//! finders up front as an explicit table of `{method name → FinderSpec}`
//! entries; the accessor provisions and caches one view per entry.

use crate::error::{Error, Result};

/// Declarative predicate/emission pair attached to a finder
///
/// Both expressions are view-language source fragments that are spliced into
/// the map function template (see [`FinderSpec::map_function`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderSpec {
    predicate: String,
    emit: String,
}

impl FinderSpec {
    /// Create a finder specification
    pub fn new(predicate: impl Into<String>, emit: impl Into<String>) -> Self {
        FinderSpec {
            predicate: predicate.into(),
            emit: emit.into(),
        }
    }

    /// Predicate expression tested against each document
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Emission statement run for matching documents
    pub fn emit(&self) -> &str {
        &self.emit
    }

    /// Render the map function source for this specification
    ///
    /// # Example
    ///
    /// ```
    /// use viewbase_core::FinderSpec;
    ///
    /// let spec = FinderSpec::new("doc.status == \"ACTIVE\"", "emit(meta.id, null)");
    /// assert_eq!(
    ///     spec.map_function(),
    ///     "function (doc, meta) {\n  if (doc.status == \"ACTIVE\") {\n    emit(meta.id, null);\n  }\n}"
    /// );
    /// ```
    pub fn map_function(&self) -> String {
        let mut map = String::with_capacity(48 + self.predicate.len() + self.emit.len());
        map.push_str("function (doc, meta) {\n");
        map.push_str("  if (");
        map.push_str(&self.predicate);
        map.push_str(") {\n");
        map.push_str("    ");
        map.push_str(&self.emit);
        map.push_str(";\n");
        map.push_str("  }\n");
        map.push('}');
        map
    }
}

/// Ordered table of finder declarations for one entity type
///
/// Method names are unique within a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderSet {
    entries: Vec<(String, FinderSpec)>,
}

impl FinderSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a finder, consuming and returning the set
    ///
    /// # Example
    ///
    /// ```
    /// use viewbase_core::{FinderSet, FinderSpec};
    ///
    /// let finders = FinderSet::new()
    ///     .with("findByStatus", FinderSpec::new("doc.status == \"ACTIVE\"", "emit(meta.id, null)"))
    ///     .unwrap();
    /// assert!(finders.get("findByStatus").is_some());
    /// ```
    pub fn with(mut self, name: impl Into<String>, spec: FinderSpec) -> Result<Self> {
        self.insert(name, spec)?;
        Ok(self)
    }

    /// Declare a finder
    ///
    /// # Errors
    ///
    /// `InvalidFinder` if the name is empty or already declared, or either
    /// expression is blank.
    pub fn insert(&mut self, name: impl Into<String>, spec: FinderSpec) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidFinder {
                reason: "finder name cannot be empty".to_string(),
            });
        }
        if self.get(&name).is_some() {
            return Err(Error::InvalidFinder {
                reason: format!("finder '{}' declared twice", name),
            });
        }
        if spec.predicate.trim().is_empty() || spec.emit.trim().is_empty() {
            return Err(Error::InvalidFinder {
                reason: format!("finder '{}' needs both a predicate and an emit", name),
            });
        }
        self.entries.push((name, spec));
        Ok(())
    }

    /// Look up a declaration by method name
    pub fn get(&self, name: &str) -> Option<&FinderSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Iterate declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FinderSpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Declared method names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
