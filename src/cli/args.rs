//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::PublishConfig;

/// Modpub - publish plugin modules to a module registry
#[derive(Parser, Debug)]
#[command(name = "modpub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish a plugin archive to the module registry
    #[command(
        long_about = "Publish a plugin archive to the module registry.\n\n\
            Scans the archive for a pack descriptor, resolves or creates the \
            module record by name, and uploads the artifact with its metadata. \
            Settings come from a TOML config file, CLI flags, or both; flags \
            override the file, and declarations found in the archive override \
            both."
    )]
    Publish(PublishArgs),

    /// Print the metadata declared in a plugin archive
    #[command(
        long_about = "Print the metadata declared in a plugin archive.\n\n\
            Runs only the extraction step: scans the archive for a pack \
            descriptor and prints the resolved metadata fields. Useful for \
            checking what a build would publish without touching the network."
    )]
    Inspect(InspectArgs),
}

/// Arguments for the `publish` command.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Path to the built plugin archive
    pub archive: PathBuf,

    /// TOML config file with publish settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry API base URL
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Access token, literal or file:<path>
    #[arg(long)]
    pub access_token: Option<String>,

    /// Project id (superseded by --project-name when both are given)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Project name to resolve into a project id
    #[arg(long)]
    pub project_name: Option<String>,

    /// Module name default
    #[arg(long)]
    pub module_name: Option<String>,

    /// Module author default
    #[arg(long)]
    pub module_author: Option<String>,

    /// Module description default
    #[arg(long)]
    pub module_description: Option<String>,

    /// Module version default
    #[arg(long)]
    pub module_version: Option<String>,

    /// Permalink default
    #[arg(long)]
    pub permalink: Option<String>,

    /// Screenshot URL (repeatable)
    #[arg(long = "screenshot", value_name = "URL")]
    pub screenshots: Vec<String>,

    /// Video URL (repeatable)
    #[arg(long = "video", value_name = "URL")]
    pub videos: Vec<String>,

    /// Constraint as type=value (repeatable)
    #[arg(long = "constraint", value_name = "TYPE=VALUE", value_parser = parse_constraint)]
    pub constraints: Vec<(String, String)>,

    /// Changelog text for this version
    #[arg(long)]
    pub changes: Option<String>,
}

impl PublishArgs {
    /// Build a config overlay from the flags (to merge over a config file).
    ///
    /// A repeated `--constraint` with the same type keeps the last value.
    pub fn overlay(&self) -> PublishConfig {
        PublishConfig {
            api_base_url: self.api_base_url.clone(),
            access_token: self.access_token.clone(),
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            module_name: self.module_name.clone(),
            module_author: self.module_author.clone(),
            module_description: self.module_description.clone(),
            module_version: self.module_version.clone(),
            permalink: self.permalink.clone(),
            screenshots: self.screenshots.clone(),
            videos: self.videos.clone(),
            constraints: self.constraints.iter().cloned().collect::<BTreeMap<_, _>>(),
            changes: self.changes.clone(),
        }
    }
}

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the built plugin archive
    pub archive: PathBuf,

    /// Version to match changelog entries against
    #[arg(long)]
    pub module_version: Option<String>,
}

/// Parse a `type=value` constraint flag.
fn parse_constraint(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(kind, value)| (kind.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected TYPE=VALUE, got '{raw}'"))
}
