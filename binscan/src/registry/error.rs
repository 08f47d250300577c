//! Error types for the bin registry client.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur talking to the bin registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Registry could not be reached or the request failed in flight.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    /// The caller's admin credential was rejected.
    #[error("Admin authentication failed: {0}")]
    Unauthorized(String),

    /// The referenced bin does not exist.
    #[error("Bin not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response; `detail` is the server's message.
    #[error("Registry returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body did not match the registry contract.
    #[error("Malformed registry response: {0}")]
    Parse(String),
}

impl RegistryError {
    /// Map a non-2xx status and its `detail` message to an error.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 | 403 => RegistryError::Unauthorized(detail),
            404 => RegistryError::NotFound(detail),
            _ => RegistryError::Status { status, detail },
        }
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegistryError::Unavailable(_) => true,
            RegistryError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
