//! Map function interpreter
//!
//! Views are defined by JavaScript-style map functions. The embedded store
//! does not host a JavaScript engine; instead it compiles the subset that
//! finder views use:
//!
//! ```text
//! function (doc, meta) {
//!   if (doc.status == "ACTIVE" && doc.age >= 18) {
//!     emit(meta.id, null);
//!   }
//! }
//! ```
//!
//! Supported: `if`/`else`, `emit(key, value)`, string/number/boolean/null
//! literals, member paths on the two parameters (`doc.a.b`, `doc["a"]`,
//! `doc.tags[0]`), `==`/`===`, `!=`/`!==`, `<`, `<=`, `>`, `>=`, `&&`, `||`,
//! `!`, unary `-` and parentheses. Anything else is a compile error.

mod eval;
mod lexer;
mod parser;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Map function compile error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct MapError {
    /// What went wrong
    pub message: String,
    /// Byte offset into the source
    pub offset: usize,
}

impl MapError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        MapError {
            message: message.into(),
            offset,
        }
    }
}

/// A compiled map function
#[derive(Debug, Clone)]
pub struct MapFunction {
    body: Vec<parser::Stmt>,
}

impl MapFunction {
    /// Compile map function source
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use viewbase_storage::MapFunction;
    ///
    /// let map = MapFunction::compile(
    ///     "function (doc, meta) { if (doc.active) { emit(meta.id, doc.name); } }",
    /// ).unwrap();
    /// let emitted = map.apply("USER:1", &json!({"active": true, "name": "ann"}));
    /// assert_eq!(emitted, vec![(json!("USER:1"), json!("ann"))]);
    /// ```
    pub fn compile(src: &str) -> Result<Self, MapError> {
        let tokens = lexer::tokenize(src)?;
        let body = parser::Parser::new(tokens, src.len()).parse_function()?;
        Ok(MapFunction { body })
    }

    /// Run the function over one document, returning emitted `(key, value)` pairs
    pub fn apply(&self, id: &str, doc: &JsonValue) -> Vec<(JsonValue, JsonValue)> {
        let meta = serde_json::json!({ "id": id, "type": "json" });
        let scope = eval::Scope { doc, meta: &meta };
        let mut out = Vec::new();
        eval::run(&self.body, &scope, &mut out);
        out
    }
}
