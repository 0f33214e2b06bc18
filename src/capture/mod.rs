//! Page capture: form pre-fill, field parsing, validation, record assembly
//!
//! A capture session is the CLI analog of the injected modal: it is begun
//! with the harvested page signals, filled in (flags instead of form
//! fields), and submitted to produce a reading record. The session carries
//! an explicit active flag so a second capture cannot start while one is in
//! flight.

mod page;
mod tags;

pub use page::{PageFetcher, PageSignals};
pub use tags::suggest_tags;

use crate::error::{Error, Result};
use crate::models::Reading;
use chrono::Utc;
use tracing::debug;

/// The capture form, pre-filled from page signals and edited by the user.
#[derive(Debug, Clone, Default)]
pub struct CaptureForm {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub highlights_text: String,
    pub notes: String,
    pub tags_text: String,
    pub domain: String,
    pub favicon: String,
}

/// Split highlight text on line breaks, trimming each segment.
pub fn split_highlights(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Split tag text on commas, trimming each segment.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

/// One capture at a time; `begin` refuses while a session is active.
#[derive(Debug, Default)]
pub struct CaptureSession {
    active: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a capture and pre-fill the form from page signals.
    pub fn begin(&mut self, signals: &PageSignals) -> Result<CaptureForm> {
        if self.active {
            return Err(Error::CaptureActive);
        }
        self.active = true;

        let suggested = suggest_tags(&signals.domain, &signals.url);
        debug!("Suggested tags for {}: {:?}", signals.domain, suggested);

        Ok(CaptureForm {
            title: signals.title.clone(),
            url: signals.url.clone(),
            summary: signals.meta_description.clone(),
            highlights_text: String::new(),
            notes: String::new(),
            tags_text: suggested.join(", "),
            domain: signals.domain.clone(),
            favicon: signals.favicon.clone(),
        })
    }

    /// Validate the form and build the reading record.
    ///
    /// A validation failure leaves the session active so the caller can fix
    /// the form and resubmit; nothing has been persisted at that point.
    pub fn submit(&mut self, form: &CaptureForm) -> Result<Reading> {
        let title = form.title.trim();
        let url = form.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(Error::Validation(
                "Please fill in both title and URL".to_string(),
            ));
        }

        let now = Utc::now();
        let (date, date_added) = Reading::format_dates(now);
        let reading = Reading {
            id: Reading::generate_id(),
            title: title.to_string(),
            url: url.to_string(),
            summary: form.summary.trim().to_string(),
            highlights: split_highlights(&form.highlights_text),
            notes: form.notes.trim().to_string(),
            tags: split_tags(&form.tags_text),
            timestamp: now,
            date,
            date_added,
            domain: form.domain.clone(),
            favicon: form.favicon.clone(),
        };

        self.active = false;
        Ok(reading)
    }

    /// Abandon the capture without producing a record.
    pub fn cancel(&mut self) {
        self.active = false;
    }
}
