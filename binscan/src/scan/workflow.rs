//! Async driver for a scan session.

use std::sync::Arc;

use parking_lot::Mutex;

use super::context::UserContext;
use super::error::ScanError;
use super::location::LocationProvider;
use super::session::{ScanConfig, ScanSession};
use super::state::ScanState;
use crate::classifier::{Classifier, ImagePayload};
use crate::outcome::ScanOutcome;
use crate::registry::BinRegistry;

/// Runs a [`ScanSession`] against live collaborators.
///
/// The session lock is never held across an await, so `reset()` and
/// `snapshot()` stay responsive while a location fix, registry fetch or
/// classification is pending. Results from an attempt that was reset in the
/// meantime come back as [`ScanError::Cancelled`].
pub struct ScanWorkflow {
    location: Arc<dyn LocationProvider>,
    registry: Arc<dyn BinRegistry>,
    classifier: Arc<dyn Classifier>,
    user: UserContext,
    session: Mutex<ScanSession>,
}

impl ScanWorkflow {
    pub fn new(
        config: ScanConfig,
        location: Arc<dyn LocationProvider>,
        registry: Arc<dyn BinRegistry>,
        classifier: Arc<dyn Classifier>,
        user: UserContext,
    ) -> Self {
        Self {
            location,
            registry,
            classifier,
            user,
            session: Mutex::new(ScanSession::new(config)),
        }
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn state(&self) -> ScanState {
        self.session.lock().state()
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> ScanSession {
        self.session.lock().clone()
    }

    /// Acquire a location fix, fetch the registry and gate.
    ///
    /// Ends in `Ready`, `NoBinsInRange`, `LocationDenied`, or back in
    /// `AwaitingLocation` if the registry could not be reached.
    pub async fn locate(&self) -> Result<(), ScanError> {
        let ticket = self.session.lock().begin_location()?;

        let fix = self.location.current_location().await;
        self.session.lock().apply_location(ticket, fix)?;

        let bins = self.registry.fetch_bins().await;
        self.session.lock().apply_bins(ticket, bins)
    }

    /// Choose a different bin inside the scan radius.
    pub fn select_bin(&self, bin_id: &str) -> Result<(), ScanError> {
        self.session.lock().select_bin(bin_id)
    }

    pub fn attach_image(&self, image: ImagePayload) -> Result<(), ScanError> {
        self.session.lock().attach_image(image)
    }

    /// Submit the attached image for the selected bin.
    ///
    /// Validation failures never reach the classifier.
    pub async fn submit(&self) -> Result<ScanOutcome, ScanError> {
        let (ticket, submission) = self.session.lock().begin_submit()?;

        let response = self
            .classifier
            .classify(&submission, self.user.token())
            .await;

        self.session.lock().apply_classification(ticket, response)
    }

    /// Abandon the current attempt and return to `AwaitingLocation`.
    pub fn reset(&self) {
        self.session.lock().reset();
    }

    /// Reset and start over with a fresh location fix.
    pub async fn retry(&self) -> Result<(), ScanError> {
        self.reset();
        self.locate().await
    }
}
