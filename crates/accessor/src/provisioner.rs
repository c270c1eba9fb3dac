//! View provisioning: resolve-or-create
//!
//! Given a finder, make sure the entity's design document holds a view of
//! the same name and return it:
//!
//! 1. Fetch the design document; if absent, start from an empty one in memory
//! 2. Scan its views for the finder name; if found, return it untouched
//! 3. Otherwise synthesize the view from the map function template, append
//!    it, and upsert the whole design document
//!
//! ## Known limitations
//!
//! - Existing remote views are trusted verbatim. If a finder's predicate or
//!   emission changes locally, the stale remote definition keeps winning
//!   until the view is updated on the server.
//! - The sequence is a read-modify-write of the whole design document. In
//!   [`ProvisioningMode::Racy`] two concurrent first resolutions against the
//!   same design document can both read "absent" and the later upsert drops
//!   the earlier view. [`ProvisioningMode::Guarded`] serialises the sequence
//!   per design document within this process; it cannot protect against
//!   other processes.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use viewbase_core::{
    DesignDocument, DocumentStore, Error, FinderSpec, Result, ViewDefinition,
};

// =============================================================================
// Design document locks
// =============================================================================
//
// One mutex per design document name, shared by every guarded provisioner in
// the process. Entries are never removed; there is one per entity type.

static DESIGN_LOCKS: Lazy<Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn design_lock(name: &str) -> Arc<Mutex<()>> {
    let mut locks = DESIGN_LOCKS.lock();
    Arc::clone(
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(()))),
    )
}

/// How concurrent first resolutions are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisioningMode {
    /// No locking; concurrent first resolutions may clobber each other
    #[default]
    Racy,
    /// Serialise resolve-or-create per design document within the process
    Guarded,
}

impl ProvisioningMode {
    /// Config spelling of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisioningMode::Racy => "racy",
            ProvisioningMode::Guarded => "guarded",
        }
    }
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvisioningMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "racy" => Ok(ProvisioningMode::Racy),
            "guarded" => Ok(ProvisioningMode::Guarded),
            other => Err(Error::config(format!(
                "invalid provisioning mode '{}', expected \"racy\" or \"guarded\"",
                other
            ))),
        }
    }
}

/// Ensures server-side views exist for finders
#[derive(Clone)]
pub struct ViewProvisioner {
    store: Arc<dyn DocumentStore>,
    mode: ProvisioningMode,
}

impl ViewProvisioner {
    /// Create a provisioner over `store`
    pub fn new(store: Arc<dyn DocumentStore>, mode: ProvisioningMode) -> Self {
        ViewProvisioner { store, mode }
    }

    /// Configured mode
    pub fn mode(&self) -> ProvisioningMode {
        self.mode
    }

    /// Return the view named `finder` in design document `design`, creating
    /// it from `spec` if it does not exist
    ///
    /// # Errors
    ///
    /// `RemoteUnavailable` if the catalog fetch or upsert fails.
    pub fn resolve(
        &self,
        design: &str,
        finder: &str,
        spec: &FinderSpec,
    ) -> Result<ViewDefinition> {
        match self.mode {
            ProvisioningMode::Racy => self.resolve_or_create(design, finder, spec),
            ProvisioningMode::Guarded => {
                let lock = design_lock(design);
                let _guard = lock.lock();
                self.resolve_or_create(design, finder, spec)
            }
        }
    }

    fn resolve_or_create(
        &self,
        design: &str,
        finder: &str,
        spec: &FinderSpec,
    ) -> Result<ViewDefinition> {
        let mut doc = match self.store.get_design_document(design)? {
            Some(doc) => doc,
            None => {
                info!(target: "viewbase::provision", design, "Design document does not exist, creating it");
                DesignDocument::empty(design)
            }
        };

        debug!(
            target: "viewbase::provision",
            design,
            views = ?doc.views.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            "Views from server"
        );

        if let Some(existing) = doc.view(finder) {
            debug!(target: "viewbase::provision", design, view = finder, "View returned from server");
            return Ok(existing.clone());
        }

        info!(target: "viewbase::provision", design, view = finder, "View not present, creating");
        let view = ViewDefinition::from_finder(finder, spec);
        doc.push_view(view.clone());
        self.store.upsert_design_document(&doc)?;
        Ok(view)
    }
}

impl fmt::Debug for ViewProvisioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewProvisioner")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
