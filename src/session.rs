//! Session lifecycle
//!
//! A `Session` binds a validated [`ViewbaseConfig`] to a [`DocumentStore`]
//! and hands out accessors whose view catalogs are already built. It is the
//! warm-up point: every accessor's `rebuild` runs here, before the accessor
//! is shared with concurrent callers.
//!
//! ```ignore
//! let session = Session::start(ViewbaseConfig::default(), store)?;
//! let users = session.accessor::<User>(finders)?;
//! let active = users.invoke_finder("findByStatus", &[])?;
//! session.stop()?;
//! ```

use crate::config::ViewbaseConfig;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use viewbase_accessor::{AccessorOptions, GenericAccessor, ProvisioningMode};
use viewbase_core::{DocumentStore, Entity, Error, FinderSet, Limits, Result};

/// An open connection to a document store
pub struct Session {
    config: ViewbaseConfig,
    mode: ProvisioningMode,
    store: Arc<dyn DocumentStore>,
    open: AtomicBool,
}

impl Session {
    /// Open a session
    ///
    /// Validates `config` and probes the store by listing its design
    /// documents.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration is invalid
    /// - `RemoteUnavailable` if the store cannot be reached
    pub fn start(config: ViewbaseConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        config.validate()?;
        let mode = config.provisioning_mode()?;

        let designs = store.design_documents()?;
        info!(
            target: "viewbase::session",
            bucket = %config.bucket,
            provisioning = %mode,
            design_documents = designs.len(),
            "Session started"
        );

        Ok(Session {
            config,
            mode,
            store,
            open: AtomicBool::new(true),
        })
    }

    /// Configuration the session was opened with
    pub fn config(&self) -> &ViewbaseConfig {
        &self.config
    }

    /// Provisioning mode handed to every accessor
    pub fn provisioning_mode(&self) -> ProvisioningMode {
        self.mode
    }

    /// True until `stop` is called
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Create an accessor for `T` and build its view catalog
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after `stop`
    /// - any provisioning failure from the catalog rebuild
    pub fn accessor<T: Entity>(&self, finders: FinderSet) -> Result<GenericAccessor<T>> {
        self.ensure_open()?;
        let accessor = GenericAccessor::with_options(
            Arc::clone(&self.store),
            finders,
            AccessorOptions {
                provisioning: self.mode,
                limits: Limits::default(),
            },
        );
        let views = accessor.rebuild()?;
        info!(target: "viewbase::session", entity = T::NAME, views, "Accessor ready");
        Ok(accessor)
    }

    /// Close the session
    ///
    /// # Errors
    ///
    /// `SessionClosed` if the session was already stopped.
    pub fn stop(&self) -> Result<()> {
        if !self.open.swap(false, Ordering::SeqCst) {
            return Err(Error::SessionClosed);
        }
        info!(target: "viewbase::session", bucket = %self.config.bucket, "Session stopped");
        Ok(())
    }

    /// Connectivity check: start, hold for `warm_up_ms`, stop
    pub fn check(config: ViewbaseConfig, store: Arc<dyn DocumentStore>) -> Result<()> {
        let hold = config.warm_up();
        let session = Session::start(config, store)?;
        std::thread::sleep(hold);
        session.stop()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::SessionClosed)
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.is_open() {
            warn!(target: "viewbase::session", bucket = %self.config.bucket, "Session dropped without stop");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
