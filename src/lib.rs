//! viewbase - Typed accessors over a JSON document store
//!
//! Entities are stored as JSON documents under `<ENTITY>:<id>` keys. Finders
//! are declared as predicate/emit pairs and backed by server-side views that
//! are created on first use.
//!
//! # Quick Start
//!
//! ```ignore
//! use viewbase::{FinderSet, FinderSpec, MemoryStore, Session, ViewbaseConfig};
//!
//! let store = Arc::new(MemoryStore::new());
//! let session = Session::start(ViewbaseConfig::default(), store)?;
//!
//! let finders = FinderSet::new().with(
//!     "findByStatus",
//!     FinderSpec::new("doc.status == \"ACTIVE\"", "emit(meta.id, null)"),
//! )?;
//! let users = session.accessor::<User>(finders)?;
//!
//! users.create("42", &user)?;
//! let active = users.invoke_finder("findByStatus", &[])?;
//! session.stop()?;
//! ```

pub mod config;
pub mod session;

pub use config::{ViewbaseConfig, CONFIG_FILE_NAME};
pub use session::Session;

pub use viewbase_accessor::{
    AccessorOptions, FinderExecutor, GenericAccessor, JsonSerializer, ProvisioningMode,
    ViewCatalog, ViewProvisioner,
};
pub use viewbase_core::{
    DesignDocument, DocumentKey, DocumentStore, Entity, Error, FinderSet, FinderSpec, KeyError,
    Limits, Result, Stale, StoreError, ViewDefinition, ViewQuery, ViewRow,
};
pub use viewbase_storage::{MemoryStore, StoreStats};
