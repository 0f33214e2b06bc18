//! Remove command implementation

use crate::error::Result;
use crate::manager::ReadingManager;
use serde::Serialize;

/// Result of removing a reading
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutcome {
    pub removed_id: String,
    pub remaining: usize,
}

/// Remove a reading by id.
pub async fn cmd_remove(manager: &ReadingManager, id: &str) -> Result<RemoveOutcome> {
    let readings = manager.delete_reading(id).await?;
    Ok(RemoveOutcome {
        removed_id: id.to_string(),
        remaining: readings.len(),
    })
}

/// Print the removal confirmation.
pub fn print_remove(outcome: &RemoveOutcome) {
    println!("✓ Removed reading {}", outcome.removed_id);
    println!("  Readings: {}", outcome.remaining);
}
