//! Registry client interface.

use std::fmt;

use super::error::RegistryResult;
use crate::bins::{Bin, BinDraft};
use crate::BoxFuture;

/// Capability proving the caller may mutate the registry.
///
/// Wraps a short-lived bearer token issued by the identity service. The
/// registry validates it on every mutating call; holding one only means the
/// caller can *attempt* a mutation.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    token: String,
}

impl AdminCredential {
    /// Wrap a bearer token. Returns `None` for an empty token.
    pub fn bearer(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self { token })
        }
    }

    /// The raw token for the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Remote bin registry.
///
/// The registry owns bin storage and write serialization; this trait only
/// exposes what the scan workflow and admin surface call. Implementations
/// must be `Send + Sync` so one client can be shared across tasks.
pub trait BinRegistry: Send + Sync {
    /// Fetch the full bin set (`GET /admin/bins`).
    fn fetch_bins(&self) -> BoxFuture<'_, RegistryResult<Vec<Bin>>>;

    /// Create a bin (`POST /admin/bins`). Returns the stored bin, including
    /// any registry-assigned identifier.
    fn create_bin<'a>(
        &'a self,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<Bin>>;

    /// Replace a bin's fields (`PUT /admin/bins/{binId}`).
    fn update_bin<'a>(
        &'a self,
        bin_id: &'a str,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>>;

    /// Delete a bin (`DELETE /admin/bins/{binId}`).
    fn delete_bin<'a>(
        &'a self,
        bin_id: &'a str,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>>;
}
