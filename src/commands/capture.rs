//! Capture command implementation

use crate::capture::{CaptureSession, PageFetcher, PageSignals};
use crate::config::Config;
use crate::error::Result;
use crate::manager::ReadingManager;
use crate::models::Reading;
use serde::Serialize;
use tracing::{info, warn};

/// User-entered fields overriding the harvested pre-fills
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub highlights: Vec<String>,
    pub tags: Vec<String>,
    /// Skip the page fetch; only URL-derived signals are pre-filled
    pub offline: bool,
}

/// Result of a capture
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    pub reading: Reading,
    pub total: usize,
    pub reading_list_url: String,
}

/// Capture a page into the reading list.
pub async fn cmd_capture(
    config: &Config,
    manager: &ReadingManager,
    url: &str,
    options: CaptureOptions,
) -> Result<CaptureOutcome> {
    let signals = if options.offline {
        PageSignals::offline(url)?
    } else {
        let fetcher = PageFetcher::new(&config.fetch)?;
        match fetcher.fetch(url).await {
            Ok(signals) => signals,
            Err(e) => {
                warn!("Could not fetch {}: {}. Capturing without page signals.", url, e);
                PageSignals::offline(url)?
            }
        }
    };

    let mut session = CaptureSession::new();
    let mut form = session.begin(&signals)?;

    if let Some(title) = options.title {
        form.title = title;
    }
    if let Some(summary) = options.summary {
        form.summary = summary;
    }
    if let Some(notes) = options.notes {
        form.notes = notes;
    }
    if !options.highlights.is_empty() {
        form.highlights_text = options.highlights.join("\n");
    }
    if !options.tags.is_empty() {
        form.tags_text = options.tags.join(", ");
    }

    let reading = session.submit(&form)?;
    info!("Captured '{}' ({})", reading.title, reading.url);

    let readings = manager.add_reading(reading.clone()).await?;

    Ok(CaptureOutcome {
        reading,
        total: readings.len(),
        reading_list_url: config.blog.reading_list_url.clone(),
    })
}

/// Print the capture confirmation.
pub fn print_capture(outcome: &CaptureOutcome) {
    println!("✓ Saved '{}'", outcome.reading.title);
    println!("  ID: {}", outcome.reading.id);
    if !outcome.reading.tags.is_empty() {
        println!("  Tags: {}", outcome.reading.tags.join(", "));
    }
    println!("  Readings: {}", outcome.total);
    if !outcome.reading_list_url.is_empty() {
        println!("\n📚 View your reading list: {}", outcome.reading_list_url);
    }
}
