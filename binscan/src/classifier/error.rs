//! Error types for the classifier client.

use thiserror::Error;

/// Errors from a `/predict` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// The request never produced a response (connection, timeout, body read).
    #[error("Classifier unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status. `detail` is its message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    /// A 2xx body that is not a prediction response.
    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// HTTP status, for rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClassifierError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_detail_only() {
        let err = ClassifierError::Rejected {
            status: 403,
            detail: "You are not near a bin.".to_string(),
        };
        assert_eq!(err.to_string(), "You are not near a bin.");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_transport_has_no_status() {
        assert_eq!(ClassifierError::Transport("timeout".into()).status(), None);
    }
}
