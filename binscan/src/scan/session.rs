//! Synchronous scan state machine.
//!
//! [`ScanSession`] holds everything about one scan attempt and enforces the
//! transition rules. Long-running work (location fix, registry fetch,
//! classification) happens outside the session: the caller takes an
//! [`AttemptTicket`] when starting the work and hands it back with the
//! result. `reset()` invalidates outstanding tickets, so a result that
//! arrives after a reset is discarded with [`ScanError::Cancelled`].

use super::error::{LocationError, ScanError, ValidationError};
use super::state::ScanState;
use crate::bins::{AnnotatedBin, Bin};
use crate::classifier::{ClassifierError, ImagePayload, PredictionResponse, ScanSubmission};
use crate::coord::Coordinate;
use crate::outcome::{InterpretConfig, Interpreter, ScanOutcome};
use crate::proximity::{Geofence, ProximityConfig};
use crate::registry::RegistryError;

/// Settings for a scan session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanConfig {
    pub proximity: ProximityConfig,
    pub interpret: InterpretConfig,
}

impl ScanConfig {
    pub fn with_proximity(mut self, proximity: ProximityConfig) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn with_interpret(mut self, interpret: InterpretConfig) -> Self {
        self.interpret = interpret;
        self
    }
}

/// Proof that an asynchronous step was started in the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTicket(u64);

/// State of one scan attempt.
#[derive(Debug, Clone)]
pub struct ScanSession {
    state: ScanState,
    epoch: u64,
    geofence: Geofence,
    interpreter: Interpreter,
    reference_location: Option<Coordinate>,
    eligible_bins: Vec<AnnotatedBin>,
    gate_bins: Vec<AnnotatedBin>,
    selected_bin_id: Option<String>,
    image: Option<ImagePayload>,
    outcome: Option<ScanOutcome>,
    message: Option<String>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl ScanSession {
    /// Create a session in `AwaitingLocation`.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            state: ScanState::AwaitingLocation,
            epoch: 0,
            geofence: Geofence::new(config.proximity),
            interpreter: Interpreter::new(config.interpret),
            reference_location: None,
            eligible_bins: Vec::new(),
            gate_bins: Vec::new(),
            selected_bin_id: None,
            image: None,
            outcome: None,
            message: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn reference_location(&self) -> Option<Coordinate> {
        self.reference_location
    }

    /// Bins within the discovery radius, in registry order.
    pub fn eligible_bins(&self) -> &[AnnotatedBin] {
        &self.eligible_bins
    }

    /// Bins within the scan radius.
    pub fn gate_bins(&self) -> &[AnnotatedBin] {
        &self.gate_bins
    }

    pub fn selected_bin_id(&self) -> Option<&str> {
        self.selected_bin_id.as_deref()
    }

    /// The selected gate bin.
    pub fn selected_bin(&self) -> Option<&AnnotatedBin> {
        let id = self.selected_bin_id.as_deref()?;
        self.gate_bins.iter().find(|a| a.bin_id() == id)
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    /// Outcome once `Resulted` or `Denied`.
    pub fn outcome(&self) -> Option<&ScanOutcome> {
        self.outcome.as_ref()
    }

    /// Latest user-facing message (error or outcome text).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Radii this session gates with.
    pub fn proximity(&self) -> &ProximityConfig {
        self.geofence.config()
    }

    /// Discard everything and return to `AwaitingLocation`.
    ///
    /// Outstanding tickets become stale.
    pub fn reset(&mut self) {
        tracing::info!(from = %self.state, "Scan session reset");
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            geofence: self.geofence,
            interpreter: self.interpreter,
            ..Self::default()
        };
    }

    /// Start acquiring a location fix.
    ///
    /// Only valid in `AwaitingLocation`. Starting again while a fix is
    /// pending supersedes the earlier request.
    pub fn begin_location(&mut self) -> Result<AttemptTicket, ScanError> {
        self.require(ScanState::AwaitingLocation, "request location")?;
        self.epoch += 1;
        self.message = None;
        Ok(AttemptTicket(self.epoch))
    }

    /// Apply the location fix started with `ticket`.
    ///
    /// Success moves to `SearchingBins`; failure moves to `LocationDenied`.
    pub fn apply_location(
        &mut self,
        ticket: AttemptTicket,
        result: Result<Coordinate, LocationError>,
    ) -> Result<Coordinate, ScanError> {
        self.check_ticket(ticket)?;
        self.require(ScanState::AwaitingLocation, "apply location")?;

        let fix = result.and_then(|coord| {
            coord
                .validate()
                .map(|()| coord)
                .map_err(|e| LocationError::Unavailable(e.to_string()))
        });

        match fix {
            Ok(coord) => {
                tracing::info!(location = %coord, "Location acquired");
                self.reference_location = Some(coord);
                self.transition(ScanState::SearchingBins);
                Ok(coord)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Location unavailable");
                self.transition(ScanState::LocationDenied);
                Err(self.fail(ScanError::LocationUnavailable(e)))
            }
        }
    }

    /// Apply a registry snapshot to the acquired location.
    ///
    /// Moves to `Ready` with the nearest gate bin selected, or to
    /// `NoBinsInRange`. A registry failure returns to `AwaitingLocation`.
    pub fn apply_bins(
        &mut self,
        ticket: AttemptTicket,
        result: Result<Vec<Bin>, RegistryError>,
    ) -> Result<(), ScanError> {
        self.check_ticket(ticket)?;
        self.require(ScanState::SearchingBins, "apply bins")?;

        let bins = match result {
            Ok(bins) => bins,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load bins");
                self.reference_location = None;
                self.transition(ScanState::AwaitingLocation);
                return Err(self.fail(ScanError::Transport(
                    "Failed to load bins. Please try again.".to_string(),
                )));
            }
        };

        let Some(location) = self.reference_location else {
            return Err(ScanError::Validation(ValidationError::MissingLocation));
        };

        match self.geofence.check(&bins, &location) {
            Ok(report) => {
                self.eligible_bins = report.discovered;
                self.gate_bins = report.eligible;
                self.selected_bin_id = Some(report.nearest_bin_id);
                self.transition(ScanState::Ready);
                Ok(())
            }
            Err(e) => {
                self.eligible_bins = self.geofence.discover(&bins, &location);
                self.gate_bins.clear();
                self.selected_bin_id = None;
                self.transition(ScanState::NoBinsInRange);
                Err(self.fail(ScanError::NoBinInRange(e)))
            }
        }
    }

    /// Choose a different gate bin. Only valid in `Ready`.
    pub fn select_bin(&mut self, bin_id: &str) -> Result<(), ScanError> {
        self.require(ScanState::Ready, "select a bin")?;
        if !self.gate_bins.iter().any(|a| a.bin_id() == bin_id) {
            return Err(ValidationError::BinNotEligible(bin_id.to_string()).into());
        }
        self.selected_bin_id = Some(bin_id.to_string());
        Ok(())
    }

    /// Attach or replace the item photo.
    pub fn attach_image(&mut self, image: ImagePayload) -> Result<(), ScanError> {
        if !self.state.accepts_image() {
            return Err(self.invalid_state("attach an image"));
        }
        tracing::debug!(file = %image.file_name, bytes = image.bytes.len(), "Image attached");
        self.image = Some(image);
        Ok(())
    }

    /// Remove the attached photo.
    pub fn clear_image(&mut self) -> Result<(), ScanError> {
        if !self.state.accepts_image() {
            return Err(self.invalid_state("clear the image"));
        }
        self.image = None;
        Ok(())
    }

    /// Validate and move to `Submitting`.
    ///
    /// Validation failures leave the session in `Ready` and never produce a
    /// submission.
    pub fn begin_submit(&mut self) -> Result<(AttemptTicket, ScanSubmission), ScanError> {
        match self.state {
            ScanState::Ready => {}
            ScanState::Submitting => return Err(ScanError::AlreadySubmitting),
            ScanState::NoBinsInRange => {
                return Err(ScanError::NoBinInRange(crate::proximity::GateError::NoBinsInRange {
                    radius_m: self.geofence.config().scan_radius_meters(),
                    nearest_km: crate::proximity::nearest(&self.eligible_bins)
                        .map(|a| a.distance_km),
                }))
            }
            _ => return Err(self.invalid_state("submit a scan")),
        }

        let submission = self.validate_submission().map_err(|e| {
            let err = ScanError::Validation(e);
            self.message = Some(err.to_string());
            err
        })?;

        tracing::info!(bin_id = %submission.bin_id, "Submitting scan");
        self.message = None;
        self.transition(ScanState::Submitting);
        Ok((AttemptTicket(self.epoch), submission))
    }

    /// Apply the classifier's answer to the submission started with `ticket`.
    ///
    /// A denial moves to `Denied`, an acceptance to `Resulted`. Transport
    /// failures and contract violations return to `Ready` for a retry.
    pub fn apply_classification(
        &mut self,
        ticket: AttemptTicket,
        result: Result<PredictionResponse, ClassifierError>,
    ) -> Result<ScanOutcome, ScanError> {
        self.check_ticket(ticket)?;
        self.require(ScanState::Submitting, "apply a classification")?;

        let response = match result {
            Ok(response) => response,
            Err(ClassifierError::Malformed(reason)) => {
                tracing::error!(%reason, "Classifier payload could not be parsed");
                self.transition(ScanState::Ready);
                return Err(self.fail(ScanError::Transport(format!(
                    "Classifier returned an unreadable response: {}",
                    reason
                ))));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scan submission failed");
                self.transition(ScanState::Ready);
                return Err(self.fail(ScanError::Transport(e.to_string())));
            }
        };

        match self.interpreter.interpret(&response) {
            Ok(outcome) => {
                let next = if outcome.is_denied() {
                    ScanState::Denied
                } else {
                    ScanState::Resulted
                };
                self.message = Some(outcome.message().to_string());
                self.outcome = Some(outcome.clone());
                self.transition(next);
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Classifier response violates contract");
                self.transition(ScanState::Ready);
                Err(self.fail(ScanError::Interpretation(e)))
            }
        }
    }

    fn validate_submission(&self) -> Result<ScanSubmission, ValidationError> {
        let image = self.image.as_ref().ok_or(ValidationError::MissingImage)?;
        if image.bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if !image.is_image() {
            return Err(ValidationError::NotAnImage(image.mime_type.clone()));
        }
        let location = self
            .reference_location
            .ok_or(ValidationError::MissingLocation)?;
        if self.gate_bins.is_empty() {
            return Err(ValidationError::NoEligibleBins);
        }
        let bin_id = self
            .selected_bin_id
            .as_ref()
            .ok_or(ValidationError::NoBinSelected)?;
        if !self.gate_bins.iter().any(|a| a.bin_id() == bin_id) {
            return Err(ValidationError::BinNotEligible(bin_id.clone()));
        }

        Ok(ScanSubmission {
            image: image.clone(),
            bin_id: bin_id.clone(),
            location,
        })
    }

    fn check_ticket(&self, ticket: AttemptTicket) -> Result<(), ScanError> {
        if ticket.0 != self.epoch {
            tracing::warn!(
                ticket = ticket.0,
                current = self.epoch,
                "Discarding result from a reset scan attempt"
            );
            return Err(ScanError::Cancelled);
        }
        Ok(())
    }

    fn require(&self, expected: ScanState, action: &'static str) -> Result<(), ScanError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid_state(action))
        }
    }

    fn invalid_state(&self, action: &'static str) -> ScanError {
        ScanError::InvalidState {
            state: self.state,
            action,
        }
    }

    fn transition(&mut self, next: ScanState) {
        tracing::debug!(from = %self.state, to = %next, "Scan state transition");
        self.state = next;
    }

    fn fail(&mut self, err: ScanError) -> ScanError {
        self.message = Some(err.to_string());
        err
    }
}
