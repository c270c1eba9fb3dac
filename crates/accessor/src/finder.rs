//! Finder dispatch capability

use serde_json::Value as JsonValue;
use viewbase_core::Result;

/// Executes declared finders by name
///
/// Implemented by [`GenericAccessor`](crate::GenericAccessor); application
/// accessors can wrap it and expose one typed method per finder:
///
/// ```ignore
/// impl UserAccessor {
///     pub fn find_by_status(&self) -> Result<Vec<User>> {
///         self.inner.execute_finder("findByStatus", &[])
///     }
/// }
/// ```
pub trait FinderExecutor<T> {
    /// Run the finder `name`, returning matching entities in index order
    ///
    /// # Errors
    ///
    /// - `UnannotatedFinder` if `name` has no cached view
    /// - `RemoteUnavailable` if the query fails
    /// - `Deserialization` if any row fails to decode (no partial results)
    fn execute_finder(&self, name: &str, args: &[JsonValue]) -> Result<Vec<T>>;
}
