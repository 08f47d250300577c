//! Bin registry client
//!
//! The registry is a remote REST service that owns bin storage. This module
//! provides the [`BinRegistry`] interface, its HTTP implementation and a
//! TTL snapshot cache. Mutations require an [`AdminCredential`].
//!
//! ```ignore
//! use binscan::registry::{CachedRegistry, HttpRegistry, RegistryCacheConfig};
//!
//! let registry = CachedRegistry::new(
//!     HttpRegistry::new(ApiConfig::default())?,
//!     RegistryCacheConfig::default(),
//! );
//! let bins = registry.bins().await?;
//! ```

mod cache;
mod error;
mod http;
#[cfg(test)]
pub(crate) mod testing;
mod traits;

pub use cache::{CachedRegistry, RegistryCacheConfig, DEFAULT_CACHE_TTL};
pub use error::{RegistryError, RegistryResult};
pub use http::{parse_bins_response, parse_created_response, HttpRegistry};
pub use traits::{AdminCredential, BinRegistry};
