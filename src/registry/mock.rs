//! registry::mock
//!
//! Mock registry implementation for deterministic testing.
//!
//! # Design
//!
//! Stores projects and modules in memory and records every operation so tests
//! can assert on the exact call sequence the driver made. Failure scenarios
//! are configured per operation.
//!
//! # Example
//!
//! ```
//! use modpub::registry::mock::MockRegistry;
//! use modpub::registry::Registry;
//!
//! # tokio_test::block_on(async {
//! let registry = MockRegistry::new();
//! registry.add_project("Core", "42");
//!
//! let id = registry.project_id_by_name("Core").await.unwrap();
//! assert_eq!(id.as_deref(), Some("42"));
//! assert!(registry.project_id_by_name("Other").await.unwrap().is_none());
//! # });
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{Registry, RegistryError};
use crate::metadata::ModuleMetadata;

/// Mock registry for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    inner: Arc<Mutex<MockRegistryInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockRegistryInner {
    /// Project ids by name.
    projects: HashMap<String, String>,
    /// Module ids by (project id, module name).
    modules: HashMap<(String, String), String>,
    /// Next module id suffix to assign.
    next_module_id: u64,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Whether upload responses should carry an error field.
    reject_uploads: bool,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail with a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    ProjectIdByName,
    ModuleIdByName,
    CreateModule,
    UploadArtifact,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    ProjectIdByName {
        name: String,
    },
    ModuleIdByName {
        project_id: String,
        name: String,
    },
    CreateModule {
        project_id: String,
        name: String,
    },
    UploadArtifact {
        module_id: String,
        artifact: PathBuf,
        version: Option<String>,
        changes: Option<String>,
    },
}

impl MockRegistry {
    /// Create an empty mock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project id under a name.
    pub fn add_project(&self, name: &str, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.projects.insert(name.to_string(), id.to_string());
    }

    /// Register a module id under a project id and name.
    pub fn add_module(&self, project_id: &str, name: &str, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .modules
            .insert((project_id.to_string(), name.to_string()), id.to_string());
    }

    /// Make one operation fail with a transport error.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Make uploads answer with an application error.
    pub fn reject_uploads(&self) {
        self.inner.lock().unwrap().reject_uploads = true;
    }

    /// Recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    fn check_fail(
        inner: &MockRegistryInner,
        operation: FailOn,
    ) -> Result<(), RegistryError> {
        if inner.fail_on == Some(operation) {
            return Err(RegistryError::Transport("mock transport failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn project_id_by_name(&self, name: &str) -> Result<Option<String>, RegistryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ProjectIdByName {
            name: name.to_string(),
        });
        Self::check_fail(&inner, FailOn::ProjectIdByName)?;
        Ok(inner.projects.get(name).cloned())
    }

    async fn module_id_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<String>, RegistryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ModuleIdByName {
            project_id: project_id.to_string(),
            name: name.to_string(),
        });
        Self::check_fail(&inner, FailOn::ModuleIdByName)?;
        Ok(inner
            .modules
            .get(&(project_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn create_module(
        &self,
        project_id: &str,
        metadata: &ModuleMetadata,
        _token: &str,
    ) -> Result<Option<String>, RegistryError> {
        let name = metadata.name.clone().unwrap_or_default();
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateModule {
            project_id: project_id.to_string(),
            name: name.clone(),
        });
        Self::check_fail(&inner, FailOn::CreateModule)?;

        inner.next_module_id += 1;
        let id = format!("m{}", inner.next_module_id);
        inner
            .modules
            .insert((project_id.to_string(), name), id.clone());
        Ok(Some(id))
    }

    async fn upload_artifact(
        &self,
        module_id: &str,
        artifact: &Path,
        metadata: &ModuleMetadata,
        _token: &str,
    ) -> Result<bool, RegistryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::UploadArtifact {
            module_id: module_id.to_string(),
            artifact: artifact.to_path_buf(),
            version: metadata.version.clone(),
            changes: metadata.changes.clone(),
        });
        Self::check_fail(&inner, FailOn::UploadArtifact)?;
        Ok(!inner.reject_uploads)
    }
}
