//! View query and result row types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Index freshness requested for a view query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stale {
    /// Bring the index up to date before answering
    False,
    /// Answer from the current index, then update it
    #[default]
    UpdateAfter,
    /// Answer from the current index without updating
    Ok,
}

/// A query against one view of one design document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    design: String,
    view: String,
    stale: Stale,
}

impl ViewQuery {
    /// Query `view` in design document `design` with default staleness
    pub fn new(design: impl Into<String>, view: impl Into<String>) -> Self {
        ViewQuery {
            design: design.into(),
            view: view.into(),
            stale: Stale::default(),
        }
    }

    /// Set the staleness option
    pub fn stale(mut self, stale: Stale) -> Self {
        self.stale = stale;
        self
    }

    /// Design document name
    pub fn design(&self) -> &str {
        &self.design
    }

    /// View name
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Requested staleness
    pub fn staleness(&self) -> Stale {
        self.stale
    }
}

/// One row of a view result
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    /// Id (full key) of the emitting document
    pub id: String,
    /// Emitted key
    pub key: JsonValue,
    /// Emitted value
    pub value: JsonValue,
    /// Raw JSON of the emitting document, if it still exists
    pub document: Option<String>,
}
