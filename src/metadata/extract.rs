//! metadata::extract
//!
//! Pack descriptor extraction from a built plugin archive.
//!
//! # Algorithm
//!
//! Archive entries are enumerated in index order (deterministic for a given
//! archive). Entries that are directories or are not named `*.pack.json` are
//! skipped. Each candidate is parsed as a [`PackDescriptor`]; descriptors
//! that do not declare the plugin pack capability are skipped. The first
//! qualifying descriptor has its declarations applied in order, and scanning
//! stops once the module name is known.
//!
//! # Failure
//!
//! An unreadable archive or a malformed candidate descriptor aborts the whole
//! extraction. Malformed descriptors are not skipped: a build that ships a
//! broken descriptor should fail loudly rather than publish without metadata.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{ModuleMetadata, PackDescriptor};

/// Archive entry suffix marking a pack descriptor.
pub const DESCRIPTOR_SUFFIX: &str = ".pack.json";

/// Errors from archive extraction. All of these are fatal to the run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open archive '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read archive '{path}': {source}")]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to read archive entry '{entry}': {source}")]
    Entry {
        entry: String,
        source: std::io::Error,
    },

    #[error("malformed pack descriptor '{entry}': {message}")]
    Descriptor { entry: String, message: String },
}

/// Result of scanning an archive.
#[derive(Debug)]
pub struct Extraction {
    /// Metadata after applying any discovered declarations over the seed.
    pub metadata: ModuleMetadata,
    /// Whether a qualifying pack descriptor was found.
    pub found: bool,
}

/// Scan a plugin archive for a pack descriptor and apply its declarations.
///
/// `seed` carries the configured metadata defaults; declarations found in the
/// archive overwrite them per the merge policy.
pub fn extract_metadata(path: &Path, seed: ModuleMetadata) -> Result<Extraction, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|source| ExtractError::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    let mut metadata = seed;
    let mut found = false;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ExtractError::Archive {
                path: path.to_path_buf(),
                source,
            })?;

        if entry.is_dir() || !entry.name().ends_with(DESCRIPTOR_SUFFIX) {
            continue;
        }

        let entry_name = entry.name().to_string();
        let mut raw = String::new();
        entry
            .read_to_string(&mut raw)
            .map_err(|source| ExtractError::Entry {
                entry: entry_name.clone(),
                source,
            })?;

        let descriptor: PackDescriptor =
            serde_json::from_str(&raw).map_err(|err| ExtractError::Descriptor {
                entry: entry_name.clone(),
                message: err.to_string(),
            })?;

        if !descriptor.is_plugin_pack() {
            continue;
        }

        metadata.apply_all(&descriptor.declarations);
        found = true;

        // Scanning stops once the name is known; a nameless pack keeps
        // scanning so a later descriptor can still supply it.
        if metadata.name.is_some() {
            break;
        }
    }

    Ok(Extraction { metadata, found })
}
