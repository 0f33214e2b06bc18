//! Reading manager facade
//!
//! Composes the local store with an optional remote store injected at
//! construction. Mutations are optimistic: the local store is updated
//! first and its view is returned; the remote write happens afterward and
//! a remote failure is only logged, never rolled back, so the local view
//! can show state that silently failed to persist remotely.

use crate::error::Result;
use crate::models::{Reading, ReadingPatch};
use crate::store::{LocalStore, ReadingStore};
use std::sync::Arc;
use tracing::warn;

pub struct ReadingManager {
    local: LocalStore,
    remote: Option<Arc<dyn ReadingStore>>,
}

impl ReadingManager {
    /// Local-only manager.
    pub fn new(local: LocalStore) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    /// Manager backed by a remote store in addition to the local file.
    pub fn with_remote(local: LocalStore, remote: Arc<dyn ReadingStore>) -> Self {
        Self {
            local,
            remote: Some(remote),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The local view of the collection.
    pub async fn list(&self) -> Result<Vec<Reading>> {
        self.local.list_readings().await
    }

    pub async fn add_reading(&self, reading: Reading) -> Result<Vec<Reading>> {
        let readings = self.local.add_reading(reading.clone()).await?;

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.add_reading(reading).await {
                warn!("Remote add failed, keeping local copy: {}", e);
            }
        }

        Ok(readings)
    }

    pub async fn delete_reading(&self, id: &str) -> Result<Vec<Reading>> {
        let readings = self.local.delete_reading(id).await?;

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.delete_reading(id).await {
                warn!("Remote delete failed, local copy removed anyway: {}", e);
            }
        }

        Ok(readings)
    }

    pub async fn update_reading(&self, id: &str, patch: &ReadingPatch) -> Result<Vec<Reading>> {
        let readings = self.local.update_reading(id, patch).await?;

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.update_reading(id, patch).await {
                warn!("Remote update failed, local copy updated anyway: {}", e);
            }
        }

        Ok(readings)
    }

    /// Reconcile with the remote store. Any failure falls back to the
    /// local collection unmodified; without a remote this is just the
    /// local collection.
    pub async fn sync(&self) -> Result<Vec<Reading>> {
        let local = self.local.list_readings().await?;

        let Some(remote) = &self.remote else {
            return Ok(local);
        };

        match remote.sync(&local).await {
            Ok(merged) => {
                self.local
                    .save_readings(&merged, "Sync local readings with GitHub")
                    .await?;
                Ok(merged)
            }
            Err(e) => {
                warn!("Sync failed, falling back to local readings: {}", e);
                Ok(local)
            }
        }
    }
}
