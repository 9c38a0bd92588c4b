//! Configuration model for modlock.
//!
//! This module defines the Config struct that binds a controller to one
//! logical database and collection. It supports forward-compatible YAML
//! parsing (unknown fields are ignored), sensible defaults for optional
//! fields, and validation of config values.

use crate::error::{LockError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether lock checking is in effect.
///
/// When `Disabled`, [`LockController::go`](crate::LockController::go) reports
/// "clear to proceed" unconditionally, regardless of stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locking {
    /// Honor stored lock records (default).
    #[default]
    Enabled,
    /// Kill switch: report "clear" regardless of stored records.
    Disabled,
}

impl Locking {
    /// Parse a locking mode from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "enabled" => Some(Self::Enabled),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Configuration for the lock store and controller.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MongoDB connection string (default: "mongodb://localhost:27017").
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Name of the logical database holding the lock collection.
    #[serde(default = "default_database")]
    pub database: String,

    /// Name of the lock collection.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Whether lock checking is in effect.
    #[serde(default)]
    pub locking: Locking,

    /// Minutes after which a lock record is considered stale.
    #[serde(default = "default_stale_minutes")]
    pub stale_minutes: u32,
}

// Default value functions for serde
fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}
fn default_database() -> String {
    "unified".to_string()
}
fn default_collection() -> String {
    "moduleLock".to_string()
}
fn default_stale_minutes() -> u32 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            locking: Locking::default(),
            stale_minutes: default_stale_minutes(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config YAML file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `uri`, `database`, and `collection` must be non-empty
    /// - `stale_minutes` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(LockError::Config(
                "config validation failed: uri must be non-empty".to_string(),
            ));
        }

        if self.database.is_empty() {
            return Err(LockError::Config(
                "config validation failed: database must be non-empty".to_string(),
            ));
        }

        if self.collection.is_empty() {
            return Err(LockError::Config(
                "config validation failed: collection must be non-empty".to_string(),
            ));
        }

        if self.stale_minutes == 0 {
            return Err(LockError::Config(
                "config validation failed: stale_minutes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
