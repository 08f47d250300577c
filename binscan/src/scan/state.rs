//! Scan session states.

use std::fmt;

/// Position of a [`ScanSession`](super::ScanSession) in its lifecycle.
///
/// ```text
/// AwaitingLocation ──ok──► SearchingBins ──gate open──► Ready ──submit──► Submitting
///        │                      │   │                     ▲                 │  │  │
///        └─fail─► LocationDenied│   └─gate closed─► NoBinsInRange           │  │  │
///                               └─registry down─► AwaitingLocation          │  │  │
///                                                          Ready ◄─transport┘  │  │
///                                                 Resulted ◄─────accepted──────┘  │
///                                                 Denied   ◄─────denied───────────┘
/// ```
///
/// `LocationDenied`, `NoBinsInRange`, `Resulted` and `Denied` are resting
/// states; `reset()` returns any state to `AwaitingLocation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    AwaitingLocation,
    LocationDenied,
    SearchingBins,
    NoBinsInRange,
    Ready,
    Submitting,
    Resulted,
    Denied,
}

impl ScanState {
    /// Whether the state only exits through `reset()`.
    pub fn is_resting(&self) -> bool {
        matches!(
            self,
            ScanState::LocationDenied
                | ScanState::NoBinsInRange
                | ScanState::Resulted
                | ScanState::Denied
        )
    }

    /// Whether an image may be attached or replaced.
    pub fn accepts_image(&self) -> bool {
        matches!(
            self,
            ScanState::AwaitingLocation
                | ScanState::LocationDenied
                | ScanState::SearchingBins
                | ScanState::NoBinsInRange
                | ScanState::Ready
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::AwaitingLocation => "awaiting location",
            ScanState::LocationDenied => "location denied",
            ScanState::SearchingBins => "searching bins",
            ScanState::NoBinsInRange => "no bins in range",
            ScanState::Ready => "ready",
            ScanState::Submitting => "submitting",
            ScanState::Resulted => "resulted",
            ScanState::Denied => "denied",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
