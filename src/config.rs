//! Session configuration via `viewbase.toml`
//!
//! A default `viewbase.toml` can be written next to the application; edit it
//! and restart to change settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use viewbase_accessor::ProvisioningMode;
use viewbase_core::{Error, Result};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "viewbase.toml";

/// Session configuration loaded from `viewbase.toml`.
///
/// # Example
///
/// ```toml
/// bucket = "default"
/// provisioning = "racy"
/// warm_up_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewbaseConfig {
    /// Bucket the session is opened against.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// View provisioning mode: `"racy"` or `"guarded"`.
    #[serde(default = "default_provisioning")]
    pub provisioning: String,
    /// How long `Session::check` holds the session open, in milliseconds.
    #[serde(default = "default_warm_up_ms")]
    pub warm_up_ms: u64,
}

fn default_bucket() -> String {
    "default".to_string()
}

fn default_provisioning() -> String {
    ProvisioningMode::default().as_str().to_string()
}

fn default_warm_up_ms() -> u64 {
    1000
}

impl Default for ViewbaseConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            provisioning: default_provisioning(),
            warm_up_ms: default_warm_up_ms(),
        }
    }
}

impl ViewbaseConfig {
    /// Parse the provisioning string into a `ProvisioningMode`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the string is not `"racy"` or `"guarded"`.
    pub fn provisioning_mode(&self) -> Result<ProvisioningMode> {
        self.provisioning.parse()
    }

    /// Warm-up hold as a `Duration`.
    pub fn warm_up(&self) -> Duration {
        Duration::from_millis(self.warm_up_ms)
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::config("bucket name must not be empty"));
        }
        self.provisioning_mode()?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# viewbase session configuration
#
# Bucket holding the entity documents and design documents
bucket = "default"

# View provisioning: "racy" (default) or "guarded"
#   "racy"    = unlocked read-modify-write of the design document
#   "guarded" = one provisioning at a time per design document in this process
provisioning = "racy"

# Hold time of the start/stop connectivity check, in milliseconds
warm_up_ms = 1000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: ViewbaseConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
