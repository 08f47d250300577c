//! Remote classifier client
//!
//! The classification model is an opaque remote service reached through
//! `POST /predict` (multipart: `file`, `bin_id`, `user_lat`, `user_lng`,
//! optional bearer token). This module only moves bytes and parses JSON;
//! meaning is assigned by [`crate::outcome`].

mod error;
mod http;
mod types;

pub use error::ClassifierError;
pub use http::{parse_prediction, HttpClassifier};
pub use types::{ImagePayload, PredictionResponse, ScanSubmission};

use crate::BoxFuture;

/// Remote classification service.
pub trait Classifier: Send + Sync {
    /// Submit one scan and return the raw prediction.
    ///
    /// # Arguments
    ///
    /// * `submission` - Image, target bin and the user's location
    /// * `token` - Bearer token identifying the user, if signed in
    fn classify<'a>(
        &'a self,
        submission: &'a ScanSubmission,
        token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PredictionResponse, ClassifierError>>;
}
