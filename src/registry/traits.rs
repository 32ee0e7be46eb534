//! registry::traits
//!
//! Registry trait definition for the remote module registry.
//!
//! # Design
//!
//! The `Registry` trait is async because every operation is network I/O.
//! Absence and failure are kept distinct on purpose:
//!
//! - `Ok(None)` / `Ok(false)` means the registry answered and the resource is
//!   absent, or it reported an application error (an `error` field in the
//!   response body).
//! - `Err(RegistryError)` means the answer is unknown: the transport failed or
//!   the response body could not be interpreted.
//!
//! Callers decide how much an unknown answer matters; the publish driver logs
//! it and carries on, but never uploads without a known module id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::metadata::ModuleMetadata;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Network or connection error; the registry may never have seen the call.
    #[error("network error: {0}")]
    Transport(String),

    /// The registry answered with a body that could not be interpreted.
    #[error("invalid registry response: {0}")]
    InvalidResponse(String),

    /// The artifact file could not be read for upload.
    #[error("failed to read artifact '{path}': {source}")]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Client-side configuration problem (bad base URL, unusable token).
    #[error("invalid registry configuration: {0}")]
    Config(String),
}

/// Interface to the remote module registry.
///
/// Each operation is one idempotent HTTP round trip. See the module docs for
/// the absent-vs-unknown contract.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Resolve a project id from its name.
    async fn project_id_by_name(&self, name: &str) -> Result<Option<String>, RegistryError>;

    /// Resolve a module id from its name within a project.
    async fn module_id_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<String>, RegistryError>;

    /// Create a module under a project.
    ///
    /// Returns the new module id, or `None` when the registry reports an
    /// application error.
    async fn create_module(
        &self,
        project_id: &str,
        metadata: &ModuleMetadata,
        token: &str,
    ) -> Result<Option<String>, RegistryError>;

    /// Upload an artifact release under a module.
    ///
    /// Success is the absence of an `error` field in the registry's response.
    async fn upload_artifact(
        &self,
        module_id: &str,
        artifact: &Path,
        metadata: &ModuleMetadata,
        token: &str,
    ) -> Result<bool, RegistryError>;
}
