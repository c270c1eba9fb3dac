//! GenericAccessor: typed CRUD and finder dispatch for one entity type
//!
//! ## Keys
//!
//! Documents live at `<ENTITY_NAME_UPPERCASE>:<id>`. The uppercased name also
//! names the entity's design document.
//!
//! ## Finders
//!
//! Finders are declared up front as a [`FinderSet`]. [`GenericAccessor::rebuild`]
//! resolves (creating where absent) one view per finder and caches it;
//! [`GenericAccessor::invoke_finder`] only ever consults that cache.
//!
//! `rebuild` is expected to run once, during warm-up, before finders are
//! dispatched concurrently. It takes the catalog's write lock for its whole
//! duration, so dispatches issued meanwhile wait for the new catalog.
//!
//! ## Thread Safety
//!
//! `GenericAccessor` is `Send + Sync`. CRUD on different keys may run
//! concurrently; concurrent writes to the same key are last-writer-wins.

use crate::catalog::ViewCatalog;
use crate::finder::FinderExecutor;
use crate::provisioner::{ProvisioningMode, ViewProvisioner};
use crate::serializer::JsonSerializer;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use viewbase_core::{
    DocumentKey, DocumentStore, Entity, Error, FinderSet, Limits, Result, Stale,
    ViewDefinition, ViewQuery,
};

/// Construction options for [`GenericAccessor`]
#[derive(Debug, Clone, Default)]
pub struct AccessorOptions {
    /// Provisioning mode used by `rebuild`
    pub provisioning: ProvisioningMode,
    /// Key and document size limits
    pub limits: Limits,
}

/// Typed accessor bound to one entity type and one store
pub struct GenericAccessor<T: Entity> {
    store: Arc<dyn DocumentStore>,
    finders: FinderSet,
    provisioner: ViewProvisioner,
    serializer: JsonSerializer<T>,
    limits: Limits,
    namespace: String,
    views: RwLock<ViewCatalog>,
}

impl<T: Entity> GenericAccessor<T> {
    /// Create an accessor with default options
    ///
    /// The view catalog starts empty; call [`rebuild`](Self::rebuild) before
    /// dispatching finders.
    pub fn new(store: Arc<dyn DocumentStore>, finders: FinderSet) -> Self {
        Self::with_options(store, finders, AccessorOptions::default())
    }

    /// Create an accessor with explicit options
    pub fn with_options(
        store: Arc<dyn DocumentStore>,
        finders: FinderSet,
        options: AccessorOptions,
    ) -> Self {
        let provisioner = ViewProvisioner::new(Arc::clone(&store), options.provisioning);
        GenericAccessor {
            store,
            finders,
            provisioner,
            serializer: JsonSerializer::with_limits(options.limits.clone()),
            limits: options.limits,
            namespace: T::namespace(),
            views: RwLock::new(ViewCatalog::new()),
        }
    }

    /// Key namespace and design document name
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Declared finders
    pub fn finders(&self) -> &FinderSet {
        &self.finders
    }

    /// Derive the document key for `id`
    pub fn key(&self, id: &str) -> Result<DocumentKey> {
        Ok(DocumentKey::with_limits(T::NAME, id, &self.limits)?)
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Insert a new entity
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if a document already exists at the derived key.
    pub fn create(&self, id: &str, entity: &T) -> Result<()> {
        let key = self.key(id)?;
        let json = self.serializer.serialize(entity)?;
        info!(target: "viewbase::accessor", entity = T::NAME, key = %key, "Create");
        self.store.insert(&key.to_string(), &json)?;
        Ok(())
    }

    /// Read an entity
    ///
    /// The store lookup runs on the blocking pool; its outcome, success or
    /// failure, is delivered through the returned future exactly once.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no document exists at the derived key
    /// - `Deserialization` if the stored payload does not decode
    /// - `RemoteUnavailable` if the store call fails
    ///
    /// # Panics
    ///
    /// Panics if the future is polled outside a Tokio runtime.
    pub async fn read(&self, id: &str) -> Result<T> {
        let key = self.key(id)?;
        info!(target: "viewbase::accessor", entity = T::NAME, key = %key, "Read");

        let store = Arc::clone(&self.store);
        let raw_key = key.to_string();
        let fetched = tokio::task::spawn_blocking(move || store.get(&raw_key))
            .await
            .map_err(|e| Error::internal(format!("read task failed: {}", e)))??;

        let json = fetched.ok_or_else(|| Error::NotFound {
            key: key.to_string(),
        })?;
        self.serializer.deserialize(&json)
    }

    /// Overwrite an existing entity
    ///
    /// # Errors
    ///
    /// `NotFound` if no document exists at the derived key; nothing is
    /// created in that case.
    pub fn update(&self, id: &str, entity: &T) -> Result<()> {
        let key = self.key(id)?;
        let json = self.serializer.serialize(entity)?;
        info!(target: "viewbase::accessor", entity = T::NAME, key = %key, "Update");
        self.store.replace(&key.to_string(), &json)?;
        Ok(())
    }

    /// Remove an entity
    ///
    /// # Errors
    ///
    /// `NotFound` if no document exists at the derived key.
    pub fn delete(&self, id: &str) -> Result<()> {
        let key = self.key(id)?;
        info!(target: "viewbase::accessor", entity = T::NAME, key = %key, "Delete");
        self.store.remove(&key.to_string())?;
        Ok(())
    }

    /// Insert or overwrite an entity
    pub fn set(&self, id: &str, entity: &T) -> Result<()> {
        let key = self.key(id)?;
        let json = self.serializer.serialize(entity)?;
        info!(target: "viewbase::accessor", entity = T::NAME, key = %key, "Set");
        self.store.upsert(&key.to_string(), &json)?;
        Ok(())
    }

    // =========================================================================
    // View catalog
    // =========================================================================

    /// Rebuild the view catalog from the declared finders
    ///
    /// Returns the number of cached views.
    pub fn rebuild(&self) -> Result<usize> {
        self.rebuild_from(&self.finders)
    }

    /// Rebuild the view catalog from `finders`
    ///
    /// Clears the catalog, then resolves (creating where absent) a view for
    /// every finder. Calling it again fully replaces the previous catalog.
    /// If any resolution fails the catalog is left empty and the error is
    /// returned.
    pub fn rebuild_from(&self, finders: &FinderSet) -> Result<usize> {
        let mut views = self.views.write();
        views.clear();
        info!(
            target: "viewbase::accessor",
            entity = T::NAME,
            finders = finders.len(),
            "Scanning finders"
        );

        let mut fresh = ViewCatalog::new();
        for (name, spec) in finders.iter() {
            let view = self.provisioner.resolve(&self.namespace, name, spec)?;
            debug!(target: "viewbase::accessor", finder = name, "Caching view");
            fresh.insert(name, view);
        }

        *views = fresh;
        Ok(views.len())
    }

    /// The cached view for `finder`, if any
    pub fn cached_view(&self, finder: &str) -> Option<ViewDefinition> {
        self.views.read().get(finder).cloned()
    }

    /// Names of all cached finders, sorted
    pub fn cached_finders(&self) -> Vec<String> {
        self.views.read().names()
    }

    // =========================================================================
    // Finder dispatch
    // =========================================================================

    /// Execute the finder `name`
    ///
    /// `args` are accepted for call-site symmetry; views take no parameters,
    /// so they are not sent to the store.
    pub fn invoke_finder(&self, name: &str, args: &[JsonValue]) -> Result<Vec<T>> {
        let view = self
            .cached_view(name)
            .ok_or_else(|| Error::UnannotatedFinder {
                name: name.to_string(),
            })?;
        if !args.is_empty() {
            debug!(target: "viewbase::accessor", finder = name, args = args.len(), "Ignoring finder arguments");
        }

        let query = ViewQuery::new(self.namespace.as_str(), view.name.as_str()).stale(Stale::False);
        let rows = self.store.query(&query)?;
        debug!(
            target: "viewbase::accessor",
            entity = T::NAME,
            finder = name,
            rows = rows.len(),
            "Finder executed"
        );

        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            // Rows whose document vanished after indexing carry no content
            let Some(json) = row.document else {
                continue;
            };
            entities.push(self.serializer.deserialize(&json)?);
        }
        Ok(entities)
    }
}

impl<T: Entity> FinderExecutor<T> for GenericAccessor<T> {
    fn execute_finder(&self, name: &str, args: &[JsonValue]) -> Result<Vec<T>> {
        self.invoke_finder(name, args)
    }
}

impl<T: Entity> fmt::Debug for GenericAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericAccessor")
            .field("entity", &T::NAME)
            .field("finders", &self.finders.names())
            .field("provisioner", &self.provisioner)
            .finish_non_exhaustive()
    }
}
