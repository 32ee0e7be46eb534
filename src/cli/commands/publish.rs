//! cli::commands::publish
//!
//! Publish a plugin archive to the module registry.
//!
//! # Algorithm
//!
//! 1. Extract metadata from the archive (fatal on failure)
//! 2. Resolve the access token (`file:<path>` indirection reads the first line)
//! 3. If a project name is configured, resolve the project id by name
//! 4. Resolve the module id by name; create the module if absent
//! 5. Upload the artifact under the resolved module id
//!
//! Steps 3 and 4 are best-effort: a lookup that fails at the transport level
//! is logged and treated as "not found". The upload never runs without a
//! known module id.
//!
//! # Example
//!
//! ```bash
//! # Everything from a config file
//! modpub publish target/chat.jar --config modpub.toml
//!
//! # Flags override the file
//! modpub publish target/chat.jar --config modpub.toml --module-version 1.2
//! ```

use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};

use crate::cli::args::PublishArgs;
use crate::config::PublishConfig;
use crate::metadata;
use crate::registry::{HttpRegistry, Registry};
use crate::secrets;
use crate::ui::output::{self, Verbosity};

/// Run the publish command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn publish(args: &PublishArgs, verbosity: Verbosity) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PublishConfig::load(path)?,
        None => PublishConfig::default(),
    };
    config = config.merged(args.overlay());

    let registry = HttpRegistry::new(config.api_base_url(), verbosity)?;

    // Use tokio runtime to run async code
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_publish(&registry, &config, &args.archive, verbosity))
}

/// Drive the extract/resolve/upload pipeline against any registry.
///
/// Split out from [`publish`] so integration tests can run the full pipeline
/// against a mock registry.
pub async fn run_publish(
    registry: &dyn Registry,
    config: &PublishConfig,
    artifact: &Path,
    verbosity: Verbosity,
) -> Result<()> {
    output::print("Modpub module uploader", verbosity);
    output::print(format!("Using API: {}", config.api_base_url()), verbosity);

    let extraction = metadata::extract_metadata(artifact, config.seed_metadata())
        .context("failed to scan plugin archive")?;
    if !extraction.found {
        output::warn("no plugin pack descriptor found in archive", verbosity);
    }
    let meta = extraction.metadata;
    let Some(module_name) = meta.name.clone() else {
        bail!("module name is neither declared in the archive nor configured");
    };

    let raw_token = config
        .access_token
        .as_deref()
        .ok_or_else(|| anyhow!("no access token configured"))?;
    let token = secrets::resolve_access_token(raw_token)?;

    let mut project_id = config.project_id.clone();
    if let Some(project_name) = &config.project_name {
        output::print("Getting project id from name ...", verbosity);
        match registry.project_id_by_name(project_name).await {
            Ok(Some(id)) => project_id = Some(id),
            Ok(None) => output::warn(format!("project '{project_name}' not found"), verbosity),
            Err(err) => output::warn(format!("project lookup failed: {err}"), verbosity),
        }
    }
    let project_id = project_id
        .ok_or_else(|| anyhow!("no project id available; set project_id or project_name"))?;

    output::print("Getting module id from name ...", verbosity);
    let resolved = match registry.module_id_by_name(&project_id, &module_name).await {
        Ok(id) => id,
        Err(err) => {
            output::warn(format!("module lookup failed: {err}"), verbosity);
            None
        }
    };
    let module_id = match resolved {
        Some(id) => id,
        None => {
            output::print("Creating a new module!", verbosity);
            registry
                .create_module(&project_id, &meta, &token)
                .await
                .context("module creation failed")?
                .ok_or_else(|| anyhow!("registry refused to create module '{module_name}'"))?
        }
    };
    output::print(format!("Module id: {module_id}"), verbosity);

    let uploaded = registry
        .upload_artifact(&module_id, artifact, &meta, &token)
        .await
        .context("artifact upload failed")?;
    if !uploaded {
        bail!("module upload failed");
    }
    output::print("Module upload success!", verbosity);
    Ok(())
}
