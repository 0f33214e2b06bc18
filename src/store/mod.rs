//! Reading persistence backends
//!
//! Both the local JSON file and the GitHub-backed store implement the same
//! storage capability: list the collection, overwrite the collection. The
//! mutating operations read everything, mutate in memory, and write
//! everything back: every logical edit is a full rewrite of the backing
//! file.

mod github;
mod local;

pub use github::{decode_content, encode_content, GitHubStore};
pub use local::LocalStore;

use crate::error::{Error, Result};
use crate::models::{Reading, ReadingPatch};
use async_trait::async_trait;

/// Storage capability shared by the local and remote backends.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Return the stored collection, most recent first.
    async fn list_readings(&self) -> Result<Vec<Reading>>;

    /// Overwrite the stored collection. `message` becomes the commit
    /// message on backends that have one.
    async fn save_readings(&self, readings: &[Reading], message: &str) -> Result<()>;

    /// Insert a reading at the head of the collection.
    async fn add_reading(&self, reading: Reading) -> Result<Vec<Reading>> {
        let mut readings = self.list_readings().await?;
        let message = format!("Add reading: {}", reading.title);
        readings.insert(0, reading);
        self.save_readings(&readings, &message).await?;
        Ok(readings)
    }

    /// Remove the reading with the given id.
    async fn delete_reading(&self, id: &str) -> Result<Vec<Reading>> {
        let mut readings = self.list_readings().await?;
        let before = readings.len();
        readings.retain(|r| r.id != id);
        if readings.len() == before {
            return Err(Error::ReadingNotFound(id.to_string()));
        }
        self.save_readings(&readings, &format!("Delete reading: {}", id))
            .await?;
        Ok(readings)
    }

    /// Apply a patch to the reading with the given id.
    async fn update_reading(&self, id: &str, patch: &ReadingPatch) -> Result<Vec<Reading>> {
        let mut readings = self.list_readings().await?;
        let Some(reading) = readings.iter_mut().find(|r| r.id == id) else {
            return Err(Error::ReadingNotFound(id.to_string()));
        };
        patch.apply(reading);
        let message = format!("Update reading: {}", reading.title);
        self.save_readings(&readings, &message).await?;
        Ok(readings)
    }

    /// Reconcile this store's collection with a local one: the stored
    /// collection is the base, unmatched local records are appended, and
    /// the result is written back only when it grew.
    async fn sync(&self, local: &[Reading]) -> Result<Vec<Reading>> {
        let remote = self.list_readings().await?;
        let remote_count = remote.len();
        let merged = merge_readings(remote, local);
        if merged.len() != remote_count {
            self.save_readings(&merged, "Sync local readings with GitHub")
                .await?;
        }
        Ok(merged)
    }
}

/// Merge a local collection into a base collection.
///
/// A local record is appended when no base record shares its id, or, as a
/// fallback, its (url, title) pair (locally-created records may never have
/// round-tripped their id). Deletions do not propagate: there are no
/// tombstones, so a record removed on one side reappears after merge. The
/// result is sorted by timestamp, newest first.
pub fn merge_readings(base: Vec<Reading>, local: &[Reading]) -> Vec<Reading> {
    let mut merged = base;

    for candidate in local {
        let exists = merged.iter().any(|r| {
            r.id == candidate.id || (r.url == candidate.url && r.title == candidate.title)
        });
        if !exists {
            merged.push(candidate.clone());
        }
    }

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}
