//! Sync command implementation

use crate::error::Result;
use crate::manager::ReadingManager;
use serde::Serialize;

/// Result of a sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub total: usize,
    pub remote_configured: bool,
}

/// Reconcile the local collection with the remote store.
pub async fn cmd_sync(manager: &ReadingManager) -> Result<SyncOutcome> {
    let readings = manager.sync().await?;
    Ok(SyncOutcome {
        total: readings.len(),
        remote_configured: manager.has_remote(),
    })
}

/// Print the sync summary.
pub fn print_sync(outcome: &SyncOutcome) {
    if outcome.remote_configured {
        println!("✓ Synced with GitHub");
    } else {
        println!("No remote configured; nothing to sync.");
        println!("Run 'pagemark init --force' to set up GitHub sync.");
    }
    println!("  Readings: {}", outcome.total);
}
