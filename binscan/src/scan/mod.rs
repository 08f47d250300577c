//! Proximity-gated scan workflow
//!
//! See [`ScanState`] for the transition diagram.
//!
//! [`ScanSession`] owns the rules and is fully synchronous. [`ScanWorkflow`]
//! drives a session against a [`LocationProvider`], a
//! [`BinRegistry`](crate::registry::BinRegistry) and a
//! [`Classifier`](crate::classifier::Classifier).

mod context;
mod error;
mod location;
mod session;
mod state;
mod workflow;

pub use context::UserContext;
pub use error::{LocationError, ScanError, ValidationError};
pub use location::{FixedLocation, LocationProvider, UnsupportedLocation};
pub use session::{AttemptTicket, ScanConfig, ScanSession};
pub use state::ScanState;
pub use workflow::ScanWorkflow;
