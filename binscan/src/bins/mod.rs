//! Collection bins
//!
//! Registry entities ([`Bin`], [`BinStatus`]), the distance-annotated view
//! used by proximity queries ([`AnnotatedBin`]), the registry write shape
//! ([`BinDraft`]) and the derived capacity severity model.

mod status;
mod types;

pub use status::{
    BinCondition, FleetSummary, Severity, SeverityThresholds, DEFAULT_CRITICAL_RATIO,
    DEFAULT_WARNING_RATIO,
};
pub use types::{AnnotatedBin, Bin, BinDraft, BinStatus, DEFAULT_MAX_CAPACITY_KG};
