//! Geofence gate: the anti-fraud scan-eligibility check.
//!
//! A user may only submit a scan against a bin within the strict scan
//! radius. The gate never falls back to the discovery set when nothing is
//! close enough; it reports [`GateError::NoBinsInRange`] instead.

use thiserror::Error;

use super::config::ProximityConfig;
use super::{nearby, nearest};
use crate::bins::{AnnotatedBin, Bin};
use crate::coord::Coordinate;

/// Re-filter an already-annotated set down to the strict radius.
///
/// Order is preserved. The boundary is inclusive.
pub fn scan_eligible(annotated: &[AnnotatedBin], strict_radius_km: f64) -> Vec<AnnotatedBin> {
    annotated
        .iter()
        .filter(|a| a.distance_km <= strict_radius_km)
        .cloned()
        .collect()
}

/// Gate rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    /// Location is known but no bin lies within the scan radius.
    #[error(
        "You are not near any registered bin. Please move within {radius_m:.0} meters of a bin to scan waste."
    )]
    NoBinsInRange {
        /// Scan radius in metres.
        radius_m: f64,
        /// Distance to the nearest discovered bin, if any lies in the discovery radius.
        nearest_km: Option<f64>,
    },
}

/// Result of a successful gate check.
#[derive(Debug, Clone, PartialEq)]
pub struct GateReport {
    /// Bins within the discovery radius, in registry order.
    pub discovered: Vec<AnnotatedBin>,
    /// Subset of `discovered` within the scan radius. Never empty.
    pub eligible: Vec<AnnotatedBin>,
    /// Identifier of the nearest eligible bin.
    pub nearest_bin_id: String,
}

/// Applies a [`ProximityConfig`] to bin snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geofence {
    config: ProximityConfig,
}

impl Geofence {
    /// Create a gate with the given radii.
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    /// Radii in use.
    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Bins within the discovery radius of `point`.
    pub fn discover(&self, bins: &[Bin], point: &Coordinate) -> Vec<AnnotatedBin> {
        nearby(bins, point, self.config.discovery_radius_km)
    }

    /// Run both stages and decide whether `point` may scan.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NoBinsInRange`] when the strict stage is empty.
    pub fn check(&self, bins: &[Bin], point: &Coordinate) -> Result<GateReport, GateError> {
        let discovered = self.discover(bins, point);
        let eligible = scan_eligible(&discovered, self.config.scan_radius_km);

        let Some(nearest_bin_id) = nearest(&eligible).map(|a| a.bin_id().to_string()) else {
            let nearest_km = nearest(&discovered).map(|a| a.distance_km);
            tracing::info!(
                discovered = discovered.len(),
                nearest_km = ?nearest_km,
                scan_radius_km = self.config.scan_radius_km,
                "Scan gate closed: no bin within scan radius"
            );
            return Err(GateError::NoBinsInRange {
                radius_m: self.config.scan_radius_meters(),
                nearest_km,
            });
        };

        tracing::debug!(
            discovered = discovered.len(),
            eligible = eligible.len(),
            nearest = %nearest_bin_id,
            "Scan gate open"
        );

        Ok(GateReport {
            discovered,
            eligible,
            nearest_bin_id,
        })
    }
}
