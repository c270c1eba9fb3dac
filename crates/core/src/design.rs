//! Design documents and view definitions
//!
//! A design document groups the views of one entity type and is named after
//! the entity's namespace. Views are identified by name within their design
//! document; a view's name equals the finder method that created it.

use crate::finder::FinderSpec;
use serde::{Deserialize, Serialize};

/// A named, server-persisted view definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// View name (equals the finder method name)
    pub name: String,
    /// Map function source
    pub map: String,
    /// Optional reduce function source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

impl ViewDefinition {
    /// Create a map-only view
    pub fn new(name: impl Into<String>, map: impl Into<String>) -> Self {
        ViewDefinition {
            name: name.into(),
            map: map.into(),
            reduce: None,
        }
    }

    /// Synthesize a view for a finder from the map function template
    pub fn from_finder(name: impl Into<String>, spec: &FinderSpec) -> Self {
        Self::new(name, spec.map_function())
    }
}

/// A named container of views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Design document name (uppercased entity name)
    pub name: String,
    /// Views in server order
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
}

impl DesignDocument {
    /// Create a design document with the given views
    pub fn new(name: impl Into<String>, views: Vec<ViewDefinition>) -> Self {
        DesignDocument {
            name: name.into(),
            views,
        }
    }

    /// Create a design document with no views (not yet persisted)
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Find a view by name (linear scan)
    pub fn view(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Append a view
    ///
    /// Does not check for an existing view of the same name; callers resolve
    /// with [`view`](Self::view) first.
    pub fn push_view(&mut self, view: ViewDefinition) {
        self.views.push(view);
    }

    /// Number of views
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True if the document holds no views
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
