//! List command implementation

use crate::error::Result;
use crate::manager::ReadingManager;
use crate::models::Reading;

/// List readings from the local view, optionally filtered by tag.
pub async fn cmd_list(
    manager: &ReadingManager,
    tag: Option<String>,
    limit: Option<usize>,
) -> Result<Vec<Reading>> {
    let mut readings = manager.list().await?;

    if let Some(tag) = tag {
        readings.retain(|r| r.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)));
    }
    if let Some(limit) = limit {
        readings.truncate(limit);
    }

    Ok(readings)
}

/// Print the reading list to the console.
pub fn print_readings(readings: &[Reading]) {
    println!("\n📚 Reading List\n");

    if readings.is_empty() {
        println!("No readings yet. Use 'pagemark capture <url>' to save a page.");
        return;
    }

    for reading in readings {
        println!("• {}", reading.title);
        println!("  ID: {}", reading.id);
        println!("  URL: {}", reading.url);
        if !reading.summary.is_empty() {
            println!("  Summary: {}", reading.summary);
        }
        if !reading.tags.is_empty() {
            println!("  Tags: {}", reading.tags.join(", "));
        }
        if !reading.date.is_empty() {
            println!("  Saved: {}", reading.date);
        }
        println!();
    }
}
