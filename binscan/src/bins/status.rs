//! Derived capacity severity.
//!
//! Severity is a display-only classification of a bin's fill ratio. It never
//! overwrites the stored [`BinStatus`]; both are surfaced side by side through
//! [`BinCondition`].

use std::collections::BTreeMap;
use std::fmt;

use super::types::{Bin, BinStatus};

/// Default fill ratio at or above which a bin is critical.
pub const DEFAULT_CRITICAL_RATIO: f64 = 0.9;

/// Default fill ratio at or above which a bin is a warning.
pub const DEFAULT_WARNING_RATIO: f64 = 0.6;

/// Fill-ratio thresholds for severity classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityThresholds {
    /// Ratio at or above which severity is `Critical`.
    pub critical_ratio: f64,
    /// Ratio at or above which severity is `Warning`.
    pub warning_ratio: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_ratio: DEFAULT_CRITICAL_RATIO,
            warning_ratio: DEFAULT_WARNING_RATIO,
        }
    }
}

impl SeverityThresholds {
    /// Create thresholds from explicit ratios.
    pub fn new(critical_ratio: f64, warning_ratio: f64) -> Self {
        Self {
            critical_ratio,
            warning_ratio,
        }
    }
}

/// Display severity of a bin's fill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Classify a fill ratio. Critical is checked before warning.
    pub fn classify(ratio: f64, thresholds: &SeverityThresholds) -> Self {
        if ratio >= thresholds.critical_ratio {
            Severity::Critical
        } else if ratio >= thresholds.warning_ratio {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored status and derived severity of one bin, surfaced together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinCondition {
    pub status: BinStatus,
    pub severity: Severity,
    pub ratio: f64,
}

impl Bin {
    /// Fill ratio `current / max`.
    ///
    /// A zero, negative or non-finite maximum yields `0.0`. Overfilled bins
    /// are passed through, so the ratio may exceed `1.0`.
    pub fn capacity_ratio(&self) -> f64 {
        if !self.max_capacity.is_finite() || self.max_capacity <= 0.0 {
            return 0.0;
        }
        let ratio = self.current_capacity / self.max_capacity;
        if ratio.is_finite() {
            ratio
        } else {
            0.0
        }
    }

    /// Fill percentage clamped to `[0, 100]` for progress bars.
    pub fn fill_percent(&self) -> f64 {
        (self.capacity_ratio() * 100.0).clamp(0.0, 100.0)
    }

    /// Derived severity under the given thresholds.
    pub fn severity(&self, thresholds: &SeverityThresholds) -> Severity {
        Severity::classify(self.capacity_ratio(), thresholds)
    }

    /// Stored status together with derived severity.
    pub fn condition(&self, thresholds: &SeverityThresholds) -> BinCondition {
        let ratio = self.capacity_ratio();
        BinCondition {
            status: self.status,
            severity: Severity::classify(ratio, thresholds),
            ratio,
        }
    }
}

/// Counts over a bin set by stored status and by derived severity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSummary {
    pub total: usize,
    pub by_status: BTreeMap<BinStatus, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub total_current_kg: f64,
    pub total_max_kg: f64,
}

impl FleetSummary {
    /// Summarize a bin set.
    pub fn from_bins(bins: &[Bin], thresholds: &SeverityThresholds) -> Self {
        let mut summary = Self {
            total: bins.len(),
            ..Default::default()
        };
        for status in BinStatus::ALL {
            summary.by_status.insert(status, 0);
        }
        for bin in bins {
            *summary.by_status.entry(bin.status).or_default() += 1;
            *summary.by_severity.entry(bin.severity(thresholds)).or_default() += 1;
            summary.total_current_kg += bin.current_capacity;
            summary.total_max_kg += bin.max_capacity;
        }
        summary
    }

    /// Number of bins with the given status.
    pub fn status_count(&self, status: BinStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Number of bins with the given severity.
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}
