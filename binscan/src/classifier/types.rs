//! Classifier wire types.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::coord::Coordinate;

/// Raw `/predict` response body.
///
/// Mirrors the classifier's JSON. Reward fields are optional here because a
/// denial may or may not include them; the outcome interpreter decides which
/// fields are read.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PredictionResponse {
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub all_predictions: HashMap<String, f64>,
    #[serde(default)]
    pub stars_awarded: Option<i64>,
    #[serde(default)]
    pub new_total_stars: Option<i64>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    /// Legacy alias of `waste_category`.
    #[serde(default)]
    pub waste_type: Option<String>,
    #[serde(default)]
    pub waste_category: Option<String>,
    #[serde(default)]
    pub estimated_weight_kg: Option<f64>,
    #[serde(default)]
    pub recyclability: Option<String>,
    #[serde(default)]
    pub clarity_score: Option<f64>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub denial_reason: Option<String>,
    #[serde(default)]
    pub credits_earned: Option<i64>,
}

/// Photo of the deposited item.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("bytes", &self.bytes.len())
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl ImagePayload {
    /// Wrap image bytes, guessing the MIME type from the file name.
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime_type(&file_name).to_string();
        Self {
            bytes,
            file_name,
            mime_type,
        }
    }

    /// Override the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Whether the MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Everything sent to `/predict` for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSubmission {
    pub image: ImagePayload,
    pub bin_id: String,
    pub location: Coordinate,
}
