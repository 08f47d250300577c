//! Bin registry entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// Default maximum capacity (kg) applied when the registry omits it.
pub const DEFAULT_MAX_CAPACITY_KG: f64 = 100.0;

/// Operational status explicitly set on a bin by an administrator.
///
/// Independent of the capacity ratio: a bin can be `Active` while nearly full.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BinStatus {
    /// Accepting deposits.
    #[default]
    Active,
    /// Marked full; still listed but flagged in the picker.
    Full,
    /// Out of service.
    Inactive,
}

impl BinStatus {
    /// All statuses in display order.
    pub const ALL: [BinStatus; 3] = [BinStatus::Active, BinStatus::Full, BinStatus::Inactive];

    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinStatus::Active => "active",
            BinStatus::Full => "full",
            BinStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for BinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(BinStatus::Active),
            "full" => Ok(BinStatus::Full),
            "inactive" => Ok(BinStatus::Inactive),
            other => Err(format!(
                "unknown bin status '{}' (expected active, full or inactive)",
                other
            )),
        }
    }
}

fn default_max_capacity() -> f64 {
    DEFAULT_MAX_CAPACITY_KG
}

/// A collection bin as stored by the registry.
///
/// The core treats bins as read-mostly snapshots; writes go through the
/// registry client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Registry-assigned identifier, stable for the bin's lifetime.
    #[serde(rename = "binId")]
    pub bin_id: String,

    /// Physical location.
    #[serde(flatten)]
    pub location: Coordinate,

    /// Human label, not unique.
    #[serde(rename = "areaName", default)]
    pub area_name: String,

    /// Current fill in kilograms.
    #[serde(default)]
    pub current_capacity: f64,

    /// Maximum fill in kilograms.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: f64,

    /// Explicitly set operational status.
    #[serde(default)]
    pub status: BinStatus,
}

impl Bin {
    /// Create a bin with zero fill and default capacity.
    pub fn new(bin_id: impl Into<String>, location: Coordinate) -> Self {
        Self {
            bin_id: bin_id.into(),
            location,
            area_name: String::new(),
            current_capacity: 0.0,
            max_capacity: DEFAULT_MAX_CAPACITY_KG,
            status: BinStatus::Active,
        }
    }

    /// Set the area label.
    pub fn with_area_name(mut self, name: impl Into<String>) -> Self {
        self.area_name = name.into();
        self
    }

    /// Set current and maximum capacity.
    pub fn with_capacity(mut self, current: f64, max: f64) -> Self {
        self.current_capacity = current;
        self.max_capacity = max;
        self
    }

    /// Set the stored status.
    pub fn with_status(mut self, status: BinStatus) -> Self {
        self.status = status;
        self
    }

    /// Area name if set, otherwise the bin id.
    pub fn display_name(&self) -> &str {
        if self.area_name.trim().is_empty() {
            &self.bin_id
        } else {
            &self.area_name
        }
    }
}

/// A bin annotated with its distance from a reference point.
///
/// Ephemeral: computed per query and never written back. The wrapped
/// [`Bin`] is carried unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBin {
    /// The registry bin, untouched.
    pub bin: Bin,
    /// Distance from the query point in kilometres.
    pub distance_km: f64,
}

impl AnnotatedBin {
    /// Pair a bin with a precomputed distance.
    pub fn new(bin: Bin, distance_km: f64) -> Self {
        Self { bin, distance_km }
    }

    /// Registry identifier of the wrapped bin.
    pub fn bin_id(&self) -> &str {
        &self.bin.bin_id
    }

    /// Distance in whole metres, rounded.
    pub fn distance_meters(&self) -> u64 {
        (self.distance_km * 1000.0).round() as u64
    }

    /// Label shown in the bin picker, e.g. `"Karol Bagh - 22m away (FULL)"`.
    pub fn picker_label(&self) -> String {
        let mut label = format!(
            "{} - {}m away",
            self.bin.display_name(),
            self.distance_meters()
        );
        if self.bin.status == BinStatus::Full {
            label.push_str(" (FULL)");
        }
        label
    }

    /// Discard the annotation.
    pub fn into_bin(self) -> Bin {
        self.bin
    }
}

/// Write shape for registry create/update calls.
///
/// `bin_id` may be omitted on create; the registry assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinDraft {
    #[serde(rename = "binId", skip_serializing_if = "Option::is_none")]
    pub bin_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "areaName")]
    pub area_name: String,
    pub current_capacity: f64,
    pub max_capacity: f64,
    pub status: BinStatus,
}

impl BinDraft {
    /// Draft a new bin at a location with registry defaults.
    pub fn new(location: Coordinate) -> Self {
        Self {
            bin_id: None,
            latitude: location.latitude,
            longitude: location.longitude,
            area_name: String::new(),
            current_capacity: 0.0,
            max_capacity: DEFAULT_MAX_CAPACITY_KG,
            status: BinStatus::Active,
        }
    }

    /// Request a specific identifier.
    pub fn with_bin_id(mut self, id: impl Into<String>) -> Self {
        self.bin_id = Some(id.into());
        self
    }

    /// Set the area label.
    pub fn with_area_name(mut self, name: impl Into<String>) -> Self {
        self.area_name = name.into();
        self
    }

    /// Set current and maximum capacity.
    pub fn with_capacity(mut self, current: f64, max: f64) -> Self {
        self.current_capacity = current;
        self.max_capacity = max;
        self
    }

    /// Set the stored status.
    pub fn with_status(mut self, status: BinStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&Bin> for BinDraft {
    fn from(bin: &Bin) -> Self {
        Self {
            bin_id: Some(bin.bin_id.clone()),
            latitude: bin.location.latitude,
            longitude: bin.location.longitude,
            area_name: bin.area_name.clone(),
            current_capacity: bin.current_capacity,
            max_capacity: bin.max_capacity,
            status: bin.status,
        }
    }
}
