//! config
//!
//! Publish configuration schema and loading.
//!
//! # Overview
//!
//! The invoking build step supplies configuration either as CLI flags, as a
//! TOML file passed via `--config`, or both.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults (only the API base URL has one)
//! 2. Config file
//! 3. CLI flags
//!
//! Configured metadata only *seeds* the module metadata: declarations found
//! in the plugin archive overwrite it.
//!
//! # Example
//!
//! ```toml
//! access_token = "file:/run/secrets/modules-token"
//! project_name = "Core"
//! module_author = "Maxim"
//!
//! [constraints]
//! ServerVersion = ">=1.8"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::metadata::ModuleMetadata;

/// API base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://modules.mvdw-software.com/api/v1";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Publish configuration, merged from file and CLI flags.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Registry API base URL.
    pub api_base_url: Option<String>,
    /// Access token, literal or `file:<path>` indirection.
    pub access_token: Option<String>,
    /// Project id; superseded by a `project_name` lookup when both are set.
    pub project_id: Option<String>,
    /// Project name to resolve into a project id.
    pub project_name: Option<String>,
    /// Module name default (archive declarations overwrite).
    pub module_name: Option<String>,
    /// Module author default.
    pub module_author: Option<String>,
    /// Module description default.
    pub module_description: Option<String>,
    /// Module version default.
    pub module_version: Option<String>,
    /// Permalink default.
    pub permalink: Option<String>,
    /// Screenshot URL defaults.
    pub screenshots: Vec<String>,
    /// Video URL defaults.
    pub videos: Vec<String>,
    /// Constraint defaults, keyed by constraint type name.
    pub constraints: BTreeMap<String, String>,
    /// Changelog text default for the current version.
    pub changes: Option<String>,
}

impl PublishConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|err| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Overlay another configuration on top of this one.
    ///
    /// Set fields in `overlay` win; lists and the constraint map are replaced
    /// only when the overlay provides a non-empty value.
    pub fn merged(mut self, overlay: PublishConfig) -> PublishConfig {
        merge_field(&mut self.api_base_url, overlay.api_base_url);
        merge_field(&mut self.access_token, overlay.access_token);
        merge_field(&mut self.project_id, overlay.project_id);
        merge_field(&mut self.project_name, overlay.project_name);
        merge_field(&mut self.module_name, overlay.module_name);
        merge_field(&mut self.module_author, overlay.module_author);
        merge_field(&mut self.module_description, overlay.module_description);
        merge_field(&mut self.module_version, overlay.module_version);
        merge_field(&mut self.permalink, overlay.permalink);
        merge_field(&mut self.changes, overlay.changes);
        if !overlay.screenshots.is_empty() {
            self.screenshots = overlay.screenshots;
        }
        if !overlay.videos.is_empty() {
            self.videos = overlay.videos;
        }
        if !overlay.constraints.is_empty() {
            self.constraints = overlay.constraints;
        }
        self
    }

    /// API base URL with the built-in default applied.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Metadata seeded from configured defaults.
    pub fn seed_metadata(&self) -> ModuleMetadata {
        ModuleMetadata {
            name: self.module_name.clone(),
            version: self.module_version.clone(),
            author: self.module_author.clone(),
            description: self.module_description.clone(),
            permalink: self.permalink.clone(),
            screenshots: self.screenshots.clone(),
            videos: self.videos.clone(),
            constraints: self.constraints.clone(),
            changes: self.changes.clone(),
        }
    }
}

fn merge_field(base: &mut Option<String>, overlay: Option<String>) {
    if overlay.is_some() {
        *base = overlay;
    }
}
