//! registry
//!
//! Abstraction over the remote module registry.
//!
//! # Architecture
//!
//! The `Registry` trait defines the four operations the publish pipeline
//! needs: two name-based lookups, module creation, and artifact upload. Each
//! one is a single HTTP round trip with no retries; the driver treats lookup
//! failures as best-effort and continues where sensible.
//!
//! # Modules
//!
//! - `traits`: Core `Registry` trait and error type
//! - [`http`]: HTTP implementation against the registry's v1 API
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use modpub::registry::{HttpRegistry, Registry};
//!
//! let registry = HttpRegistry::new("http://modules.mvdw-software.com/api/v1", verbosity);
//! if let Some(id) = registry.project_id_by_name("Core").await? {
//!     println!("project id: {}", id);
//! }
//! ```

pub mod http;
pub mod mock;
mod traits;

pub use http::HttpRegistry;
pub use traits::*;
