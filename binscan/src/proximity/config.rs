//! Radius configuration for proximity queries and the scan gate.

/// Default discovery radius in kilometres (bins shown as "nearby").
pub const DEFAULT_DISCOVERY_RADIUS_KM: f64 = 3.0;

/// Default strict scan radius in kilometres (30 m).
pub const DEFAULT_SCAN_RADIUS_KM: f64 = 0.03;

/// Radii used by the bin picker, the live map and the scan gate.
///
/// Both radii feed the same distance engine, so the map and the gate can
/// never disagree on what "nearby" means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Broad radius populating the picker and map context.
    pub discovery_radius_km: f64,
    /// Strict radius a user must be within to submit a scan.
    pub scan_radius_km: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            discovery_radius_km: DEFAULT_DISCOVERY_RADIUS_KM,
            scan_radius_km: DEFAULT_SCAN_RADIUS_KM,
        }
    }
}

impl ProximityConfig {
    /// Set the discovery radius.
    pub fn with_discovery_radius_km(mut self, radius_km: f64) -> Self {
        self.discovery_radius_km = radius_km;
        self
    }

    /// Set the strict scan radius.
    pub fn with_scan_radius_km(mut self, radius_km: f64) -> Self {
        self.scan_radius_km = radius_km;
        self
    }

    /// Scan radius in metres, for user-facing messages.
    pub fn scan_radius_meters(&self) -> f64 {
        self.scan_radius_km * 1000.0
    }

    /// Check radii are positive, finite and correctly nested.
    pub fn validate(&self) -> Result<(), String> {
        if !self.discovery_radius_km.is_finite() || self.discovery_radius_km <= 0.0 {
            return Err(format!(
                "discovery radius must be positive, got {}",
                self.discovery_radius_km
            ));
        }
        if !self.scan_radius_km.is_finite() || self.scan_radius_km <= 0.0 {
            return Err(format!(
                "scan radius must be positive, got {}",
                self.scan_radius_km
            ));
        }
        if self.scan_radius_km > self.discovery_radius_km {
            return Err(format!(
                "scan radius ({} km) exceeds discovery radius ({} km)",
                self.scan_radius_km, self.discovery_radius_km
            ));
        }
        Ok(())
    }
}
