//! In-memory registry for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::error::{RegistryError, RegistryResult};
use super::traits::{AdminCredential, BinRegistry};
use crate::bins::{Bin, BinDraft};
use crate::coord::Coordinate;
use crate::BoxFuture;

/// Mock registry backed by a vector.
pub struct MockRegistry {
    bins: Mutex<Vec<Bin>>,
    fetches: AtomicUsize,
    fail_next: Mutex<Option<RegistryError>>,
    admin_token: Option<String>,
}

impl MockRegistry {
    pub fn with_bins(bins: Vec<Bin>) -> Self {
        Self {
            bins: Mutex::new(bins),
            fetches: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
            admin_token: None,
        }
    }

    /// Only accept mutations carrying this token.
    pub fn requiring_token(mut self, token: &str) -> Self {
        self.admin_token = Some(token.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fail_next_fetch(&self, err: RegistryError) {
        *self.fail_next.lock() = Some(err);
    }

    fn authorize(&self, credential: &AdminCredential) -> RegistryResult<()> {
        match &self.admin_token {
            Some(token) if token != credential.token() => {
                Err(RegistryError::Unauthorized("Invalid token".to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn bin_from_draft(bin_id: String, draft: &BinDraft) -> Bin {
    Bin {
        bin_id,
        location: Coordinate {
            latitude: draft.latitude,
            longitude: draft.longitude,
        },
        area_name: draft.area_name.clone(),
        current_capacity: draft.current_capacity,
        max_capacity: draft.max_capacity,
        status: draft.status,
    }
}

impl BinRegistry for MockRegistry {
    fn fetch_bins(&self) -> BoxFuture<'_, RegistryResult<Vec<Bin>>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_next.lock().take() {
                return Err(err);
            }
            Ok(self.bins.lock().clone())
        })
    }

    fn create_bin<'a>(
        &'a self,
        draft: &'a BinDraft,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<Bin>> {
        Box::pin(async move {
            self.authorize(credential)?;
            let mut bins = self.bins.lock();
            let bin_id = draft
                .bin_id
                .clone()
                .unwrap_or_else(|| format!("BIN-{:08}", bins.len() + 1));
            let bin = bin_from_draft(bin_id, draft);
            bins.push(bin.clone());
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
            self.authorize(credential)?;
            let mut bins = self.bins.lock();
            let slot = bins
                .iter_mut()
                .find(|b| b.bin_id == bin_id)
                .ok_or_else(|| RegistryError::NotFound("Bin not found".to_string()))?;
            *slot = bin_from_draft(bin_id.to_string(), draft);
            Ok(())
        })
    }

    fn delete_bin<'a>(
        &'a self,
        bin_id: &'a str,
        credential: &'a AdminCredential,
    ) -> BoxFuture<'a, RegistryResult<()>> {
        Box::pin(async move {
            self.authorize(credential)?;
            let mut bins = self.bins.lock();
            let before = bins.len();
            bins.retain(|b| b.bin_id != bin_id);
            if bins.len() == before {
                return Err(RegistryError::NotFound("Bin not found".to_string()));
            }
            Ok(())
        })
    }
}
