//! cli::commands::inspect
//!
//! Print the metadata a plugin archive declares, without touching the network.

use anyhow::{bail, Context as _, Result};

use crate::cli::args::InspectArgs;
use crate::metadata::{self, ModuleMetadata};
use crate::ui::output::{self, Verbosity};

/// Run the inspect command.
pub fn inspect(args: &InspectArgs, verbosity: Verbosity) -> Result<()> {
    let seed = ModuleMetadata {
        version: args.module_version.clone(),
        ..Default::default()
    };
    let extraction = metadata::extract_metadata(&args.archive, seed)
        .context("failed to scan plugin archive")?;
    if !extraction.found {
        bail!(
            "no plugin pack descriptor found in '{}'",
            args.archive.display()
        );
    }

    let meta = extraction.metadata;
    print_field("name", meta.name.as_deref(), verbosity);
    print_field("version", meta.version.as_deref(), verbosity);
    print_field("author", meta.author.as_deref(), verbosity);
    print_field("description", meta.description.as_deref(), verbosity);
    print_field("permalink", meta.permalink.as_deref(), verbosity);
    for screenshot in &meta.screenshots {
        output::print(format!("screenshot: {screenshot}"), verbosity);
    }
    for video in &meta.videos {
        output::print(format!("video: {video}"), verbosity);
    }
    for (kind, value) in &meta.constraints {
        output::print(format!("constraint: {kind}={value}"), verbosity);
    }
    print_field("changes", meta.changes.as_deref(), verbosity);
    Ok(())
}

fn print_field(label: &str, value: Option<&str>, verbosity: Verbosity) {
    if let Some(value) = value {
        output::print(format!("{label}: {value}"), verbosity);
    }
}
