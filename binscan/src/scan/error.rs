//! Scan workflow error taxonomy.
//!
//! Every variant is recoverable from the session's point of view: the
//! session records the message and settles into an interactive state. A
//! denial is not an error and never appears here.

use thiserror::Error;

use super::state::ScanState;
use crate::outcome::InterpretError;
use crate::proximity::GateError;

/// Why device location could not be obtained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The platform has no geolocation support.
    #[error("Geolocation is not supported on this device.")]
    Unsupported,

    /// The user refused location access.
    #[error("Could not access your location. Please enable location services to use the scanner.")]
    PermissionDenied,

    /// Location lookup failed or produced an invalid fix.
    #[error("Could not determine your location: {0}")]
    Unavailable(String),
}

/// Local pre-submit check failures. Never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please attach a photo of the item before scanning.")]
    MissingImage,

    #[error("The attached file is empty.")]
    EmptyImage,

    #[error("The attached file must be an image (got {0}).")]
    NotAnImage(String),

    #[error("Could not determine your location. Please enable location services.")]
    MissingLocation,

    #[error("You must be near a registered bin to scan waste.")]
    NoEligibleBins,

    #[error("Please select a bin before scanning.")]
    NoBinSelected,

    #[error("Bin {0} is not within scanning range.")]
    BinNotEligible(String),
}

/// Errors surfaced by scan workflow operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// Device location unavailable or unsupported. Retry after reset.
    #[error(transparent)]
    LocationUnavailable(#[from] LocationError),

    /// Location succeeded but no bin is within the scan radius.
    #[error(transparent)]
    NoBinInRange(#[from] GateError),

    /// Local input problem, fixable by the user.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network or server failure; the server's `detail` when it sent one.
    #[error("{0}")]
    Transport(String),

    /// The classifier answered 2xx with a payload violating its contract.
    #[error("Classifier returned an invalid result: {0}")]
    Interpretation(#[from] InterpretError),

    /// A scan is already in flight for this session.
    #[error("A scan is already being submitted.")]
    AlreadySubmitting,

    /// The operation is not available in the current state.
    #[error("Cannot {action} while {state}")]
    InvalidState {
        state: ScanState,
        action: &'static str,
    },

    /// The session was reset while this operation was pending; its result
    /// was discarded.
    #[error("Scan attempt was reset; result discarded")]
    Cancelled,
}

impl ScanError {
    /// Whether the error came from local validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, ScanError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_directives() {
        assert!(ScanError::from(LocationError::PermissionDenied)
            .to_string()
            .contains("enable location services"));
        assert_eq!(
            ScanError::from(ValidationError::MissingImage).to_string(),
            "Please attach a photo of the item before scanning."
        );
        assert_eq!(
            ScanError::Transport("Selected bin not found".into()).to_string(),
            "Selected bin not found"
        );
    }

    #[test]
    fn test_invalid_state_message() {
        let err = ScanError::InvalidState {
            state: ScanState::Resulted,
            action: "select a bin",
        };
        assert_eq!(err.to_string(), "Cannot select a bin while resulted");
    }

    #[test]
    fn test_is_validation() {
        assert!(ScanError::from(ValidationError::NoBinSelected).is_validation());
        assert!(!ScanError::Cancelled.is_validation());
    }
}
