//! Modpub - a CLI step that publishes plugin modules to a module registry
//!
//! Modpub is invoked at the end of a build pipeline. It inspects a built
//! plugin archive for a pack descriptor, resolves (or creates) the matching
//! module record in the remote registry, and uploads the artifact together
//! with its metadata as a multipart form post.
//!
//! # Architecture
//!
//! The codebase is a single linear pipeline split into thin layers:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to commands)
//! - [`config`] - Publish configuration (TOML file merged with CLI flags)
//! - [`metadata`] - Metadata model, declaration merge policy, archive extraction
//! - [`registry`] - Abstraction over the remote module registry (HTTP v1)
//! - [`secrets`] - Access token resolution
//! - [`ui`] - User-facing output utilities
//!
//! # Behavior Invariants
//!
//! Modpub maintains the following invariants:
//!
//! 1. The artifact is only ever read, never mutated
//! 2. An upload is attempted only once a module id is known (resolved or created)
//! 3. Metadata declarations are applied in archive order, later wins
//! 4. Registry lookups are best-effort; extraction failures abort the run

pub mod cli;
pub mod config;
pub mod metadata;
pub mod registry;
pub mod secrets;
pub mod ui;
