//! Local JSON file store
//!
//! The collection lives as a JSON array in a single file under the
//! pagemark data directory. Reads fail soft: a missing or malformed file
//! yields an empty collection rather than an error. There is no locking;
//! concurrent pagemark processes can race and clobber each other's writes
//! (documented limitation, mirrored from the single-key browser storage
//! this replaces).

use super::ReadingStore;
use crate::error::Result;
use crate::models::Reading;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// File-backed reading store
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl ReadingStore for LocalStore {
    async fn list_readings(&self) -> Result<Vec<Reading>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No readable readings file at {:?}: {}", self.path, e);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&content) {
            Ok(readings) => Ok(readings),
            Err(e) => {
                debug!("Malformed readings file at {:?}: {}", self.path, e);
                Ok(Vec::new())
            }
        }
    }

    async fn save_readings(&self, readings: &[Reading], _message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(readings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
