//! Publishing configuration.
//!
//! Settings come from an optional `reqpub.toml`, merged over stock defaults.
//! The resulting [`PublishConfig`] is passed explicitly to every render and
//! publish call; nothing in the crate reads process-wide switches.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! check_ref = true            # Resolve item references against project files
//! publish_child_links = true  # Render the "Child links" section
//! project_root = "."          # Where reference lookup starts
//! create_index = true         # Write index.html after publishing a tree
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "reqpub.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Resolve references to `file (line n)`; when off, show the raw reference quoted.
    pub check_ref: bool,
    /// Render the child-links section for items that have child links.
    pub publish_child_links: bool,
    /// Root directory searched when resolving references.
    pub project_root: PathBuf,
    /// Write `index.html` after publishing a tree.
    pub create_index: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            check_ref: true,
            publish_child_links: true,
            project_root: PathBuf::from("."),
            create_index: true,
        }
    }
}

impl PublishConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "project_root must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PublishConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PublishConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PublishConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<PublishConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        tracing::debug!(path = %path.display(), "Loaded publish config");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `reqpub.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# reqpub configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Resolve each item's reference by searching the project files.
# Published as "path/to/file (line 12)". When false, the raw reference
# text is published in quotes instead.
check_ref = true

# Include a "Child links" section for items that have child links.
publish_child_links = true

# Directory searched when resolving references (check_ref = true).
project_root = "."

# Write an index.html listing every published file after publishing a tree.
create_index = true
"##
}
