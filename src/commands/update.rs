//! Update command implementation

use crate::error::{Error, Result};
use crate::manager::ReadingManager;
use crate::models::{Reading, ReadingPatch};

/// Apply a patch to an existing reading, matched on id.
pub async fn cmd_update(
    manager: &ReadingManager,
    id: &str,
    patch: ReadingPatch,
) -> Result<Reading> {
    if patch.is_empty() {
        return Err(Error::Validation(
            "Nothing to update: pass at least one field".to_string(),
        ));
    }

    let readings = manager.update_reading(id, &patch).await?;
    readings
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::ReadingNotFound(id.to_string()))
}

/// Print the update confirmation.
pub fn print_update(reading: &Reading) {
    println!("✓ Updated '{}'", reading.title);
    println!("  ID: {}", reading.id);
    if !reading.summary.is_empty() {
        println!("  Summary: {}", reading.summary);
    }
    if !reading.notes.is_empty() {
        println!("  Notes: {}", reading.notes);
    }
    if !reading.tags.is_empty() {
        println!("  Tags: {}", reading.tags.join(", "));
    }
}
