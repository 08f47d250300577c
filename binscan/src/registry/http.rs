//! REST client for the bin registry.

use reqwest::{RequestBuilder, Url};
use serde::Deserialize;

use super::error::{RegistryError, RegistryResult};
use super::traits::{AdminCredential, BinRegistry};
use crate::api::{error_detail, ApiConfig};
use crate::bins::{Bin, BinDraft};
use crate::BoxFuture;

const BINS_PATH: &str = "admin/bins";

#[derive(Deserialize)]
struct BinsEnvelope {
    #[serde(default)]
    bins: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    bin: Bin,
}

/// Parse a `GET /admin/bins` body.
///
/// A missing `bins` field is an empty registry. Records that do not decode
/// as a [`Bin`] (unknown status, null capacity) or carry out-of-range
/// coordinates are dropped with a warning so one bad record cannot poison a
/// proximity query.
pub fn parse_bins_response(body: &[u8]) -> RegistryResult<Vec<Bin>> {
    let envelope: BinsEnvelope =
        serde_json::from_slice(body).map_err(|e| RegistryError::Parse(e.to_string()))?;

    let total = envelope.bins.len();
    let bins: Vec<Bin> = envelope
        .bins
        .into_iter()
        .filter_map(decode_bin)
        .collect();

    tracing::debug!(total, usable = bins.len(), "Parsed registry bins");
    Ok(bins)
}

fn decode_bin(record: serde_json::Value) -> Option<Bin> {
    let bin_id = record
        .get("binId")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
        .to_string();

    let bin: Bin = match serde_json::from_value(record) {
        Ok(bin) => bin,
        Err(e) => {
            tracing::warn!(%bin_id, error = %e, "Skipping unreadable bin record");
            return None;
        }
    };

    match bin.location.validate() {
        Ok(()) => Some(bin),
        Err(e) => {
            tracing::warn!(bin_id = %bin.bin_id, error = %e, "Skipping bin with invalid location");
            None
        }
    }
}

/// Parse a `POST /admin/bins` body (`{ "status": "ok", "bin": {...} }`).
pub fn parse_created_response(body: &[u8]) -> RegistryResult<Bin> {
    serde_json::from_slice::<CreatedEnvelope>(body)
        .map(|envelope| envelope.bin)
        .map_err(|e| RegistryError::Parse(e.to_string()))
}

/// HTTP implementation of [`BinRegistry`] using reqwest.
pub struct HttpRegistry {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpRegistry {
    /// Create a registry client for the given API.
    pub fn new(config: ApiConfig) -> RegistryResult<Self> {
        let client = config.build_client().map_err(RegistryError::Unavailable)?;
        Ok(Self { client, config })
    }

    fn bin_url(&self, bin_id: &str) -> RegistryResult<Url> {
        let mut url = Url::parse(&self.config.url(BINS_PATH))
            .map_err(|e| RegistryError::Unavailable(format!("Invalid registry URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| RegistryError::Unavailable("Registry URL cannot be a base".to_string()))?
            .push(bin_id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> RegistryResult<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = error_detail(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %detail, "Registry request rejected");
            return Err(RegistryError::from_status(status.as_u16(), detail));
        }

        Ok(body.to_vec())
    }
}

impl BinRegistry for HttpRegistry {
    fn fetch_bins(&self) -> BoxFuture<'_, RegistryResult<Vec<Bin>>> {
        Box::pin(async move {
            let url = self.config.url(BINS_PATH);
            tracing::debug!(%url, "Fetching bins");
            let body = self.send(self.client.get(&url)).await?;
            parse_bins_response(&body)
        })
    }

    fn create_bin<'a>(
        &'a self,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<Bin>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.config.url(BINS_PATH))
                .bearer_auth(credential.token())
                .json(draft);
            let body = self.send(request).await?;
            let bin = parse_created_response(&body)?;
            tracing::info!(bin_id = %bin.bin_id, "Created bin");
            Ok(bin)
        })
    }

    fn update_bin<'a>(
        &'a self,
        bin_id: &'a str,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>> {
        Box::pin(async move {
            let request = self
                .client
                .put(self.bin_url(bin_id)?)
                .bearer_auth(credential.token())
                .json(draft);
            self.send(request).await?;
            tracing::info!(%bin_id, "Updated bin");
            Ok(())
        })
    }

    fn delete_bin<'a>(
        &'a self,
        bin_id: &'a str,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>> {
        Box::pin(async move {
            let request = self
                .client
                .delete(self.bin_url(bin_id)?)
                .bearer_auth(credential.token());
            self.send(request).await?;
            tracing::info!(%bin_id, "Deleted bin");
            Ok(())
        })
    }
}
