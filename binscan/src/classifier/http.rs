//! Multipart `/predict` client.

use reqwest::multipart::{Form, Part};

use super::error::ClassifierError;
use super::types::{PredictionResponse, ScanSubmission};
use super::Classifier;
use crate::api::{error_detail, ApiConfig};
use crate::BoxFuture;

const PREDICT_PATH: &str = "predict";

/// Parse a 2xx `/predict` body.
pub fn parse_prediction(body: &[u8]) -> Result<PredictionResponse, ClassifierError> {
    serde_json::from_slice(body).map_err(|e| ClassifierError::Malformed(e.to_string()))
}

/// HTTP implementation of [`Classifier`] using reqwest.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpClassifier {
    /// Create a classifier client for the given API.
    pub fn new(config: ApiConfig) -> Result<Self, ClassifierError> {
        let client = config.build_client().map_err(ClassifierError::Transport)?;
        Ok(Self { client, config })
    }

    fn form(submission: &ScanSubmission) -> Result<Form, ClassifierError> {
        let file = Part::bytes(submission.image.bytes.clone())
            .file_name(submission.image.file_name.clone())
            .mime_str(&submission.image.mime_type)
            .map_err(|e| ClassifierError::Transport(format!("Invalid image type: {}", e)))?;

        Ok(Form::new()
            .part("file", file)
            .text("bin_id", submission.bin_id.clone())
            .text("user_lat", submission.location.latitude.to_string())
            .text("user_lng", submission.location.longitude.to_string()))
    }
}

impl Classifier for HttpClassifier {
    fn classify<'a>(
        &'a self,
        submission: &'a ScanSubmission,
        token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PredictionResponse, ClassifierError>> {
        Box::pin(async move {
            let mut request = self
                .client
                .post(self.config.url(PREDICT_PATH))
                .multipart(Self::form(submission)?);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            tracing::debug!(
                bin_id = %submission.bin_id,
                bytes = submission.image.bytes.len(),
                "Submitting scan"
            );

            let response = request
                .send()
                .await
                .map_err(|e| ClassifierError::Transport(format!("Request failed: {}", e)))?;

            let status = response.status();
            let body = response.bytes().await.map_err(|e| {
                ClassifierError::Transport(format!("Failed to read response: {}", e))
            })?;

            if !status.is_success() {
                let detail = error_detail(status.as_u16(), &body);
                tracing::warn!(status = status.as_u16(), %detail, "Scan rejected by classifier");
                return Err(ClassifierError::Rejected {
                    status: status.as_u16(),
                    detail,
                });
            }

            parse_prediction(&body)
        })
    }
}
