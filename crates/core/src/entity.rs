//! Entity contract
//!
//! An entity is any serde-serializable application type with a stable name.
//! The name drives both the key namespace and the design document name; the
//! entity itself knows nothing about accessors.

use crate::key::namespace_for;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An application type stored as a JSON document
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use viewbase_core::Entity;
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// impl Entity for User {
///     const NAME: &'static str = "User";
/// }
///
/// assert_eq!(User::namespace(), "USER");
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable simple type name
    const NAME: &'static str;

    /// Uppercased name used as key prefix and design document name
    fn namespace() -> String {
        namespace_for(Self::NAME)
    }
}
