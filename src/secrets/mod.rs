//! secrets
//!
//! Access token resolution.
//!
//! # Security
//!
//! - Tokens are never logged, printed, or included in error messages
//! - A `file:<path>` token reads the file's first line, so a trailing
//!   newline (or anything after it) in the secret file is harmless
//!
//! # Example
//!
//! ```ignore
//! use modpub::secrets::resolve_access_token;
//!
//! // Literal token
//! let token = resolve_access_token("s3cret")?;
//!
//! // Indirection through a file provisioned by the build environment
//! let token = resolve_access_token("file:/run/secrets/modules-token")?;
//! ```

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Prefix marking a token value as a file indirection.
pub const FILE_PREFIX: &str = "file:";

/// Errors from access token resolution.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to read access token file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("access token file '{path}' is empty")]
    EmptyFile { path: PathBuf },
}

/// Resolve a configured access token value.
///
/// A value starting with `file:` names a file whose first line is the literal
/// token; any other value is the token itself.
pub fn resolve_access_token(raw: &str) -> Result<String, SecretError> {
    let Some(path) = raw.strip_prefix(FILE_PREFIX) else {
        return Ok(raw.to_string());
    };
    let path = PathBuf::from(path);
    let contents = fs::read_to_string(&path).map_err(|source| SecretError::ReadError {
        path: path.clone(),
        source,
    })?;
    match contents.lines().next() {
        Some(line) if !line.is_empty() => Ok(line.to_string()),
        _ => Err(SecretError::EmptyFile { path }),
    }
}
