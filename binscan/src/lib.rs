//! BinScan - proximity-gated e-waste scanning
//!
//! This library implements the client side of a scan-and-credit workflow:
//! a user standing next to a registered collection bin photographs an item,
//! a remote classifier labels it, and credits are awarded for valid e-waste.
//!
//! # Modules
//!
//! - [`coord`] - coordinates and great-circle distance
//! - [`bins`] - bin records, capacity severity and fleet summaries
//! - [`proximity`] - discovery queries and the strict scan geofence
//! - [`registry`] - remote bin registry client with snapshot caching
//! - [`classifier`] - remote classifier client
//! - [`outcome`] - interpretation of classifier responses
//! - [`scan`] - the scan state machine and its async driver
//! - [`config`] - `~/.binscan/config.ini`
//! - [`logging`] - tracing subscriber setup

use std::future::Future;
use std::pin::Pin;

pub mod api;
pub mod bins;
pub mod classifier;
pub mod config;
pub mod coord;
pub mod logging;
pub mod outcome;
pub mod proximity;
pub mod registry;
pub mod scan;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Boxed future returned by the remote service traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
