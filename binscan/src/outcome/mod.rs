//! Result interpretation
//!
//! Turns a classifier [`PredictionResponse`](crate::classifier::PredictionResponse)
//! into a [`ScanOutcome`]: an acceptance with a [`Reward`] or a [`Denial`]
//! with its reason. Also provides the presentation buckets used by the
//! result view (confidence level, rating band, ranked predictions).

mod interpreter;
mod types;

pub use interpreter::{
    interpret, InterpretConfig, InterpretError, Interpreter, DEFAULT_CONFIDENCE_HIGH_THRESHOLD,
};
pub use types::{
    Acceptance, Classification, ConfidenceLevel, Denial, RankedPredictions, RatingBand,
    Recyclability, Reward, ScanOutcome, DEFAULT_TOP_PREDICTIONS,
};
