//! Reading record model

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One saved page capture.
///
/// Serialized with camelCase field names so the readings file stays
/// readable by the static-blog page that renders the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Client-generated id: millisecond timestamp plus a random suffix.
    /// Not guaranteed unique across devices; two racing captures can
    /// produce duplicates.
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Human-readable rendering of `timestamp`, e.g. "Jan 5, 2024, 3:04 PM"
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub date_added: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub favicon: String,
}

impl Reading {
    /// Generate a new record id from the current time and a random suffix.
    pub fn generate_id() -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
        format!("{}{}", millis, suffix)
    }

    /// Render the display date strings for a capture instant.
    pub fn format_dates(instant: DateTime<Utc>) -> (String, String) {
        let local = instant.with_timezone(&Local);
        let date = local.format("%b %-d, %Y, %-I:%M %p").to_string();
        let date_added = local.format("%-m/%-d/%Y").to_string();
        (date, date_added)
    }
}

/// Partial update applied to an existing reading, matched on id.
#[derive(Debug, Clone, Default)]
pub struct ReadingPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl ReadingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.notes.is_none()
            && self.highlights.is_none()
            && self.tags.is_none()
    }

    pub fn apply(&self, reading: &mut Reading) {
        if let Some(title) = &self.title {
            reading.title = title.clone();
        }
        if let Some(summary) = &self.summary {
            reading.summary = summary.clone();
        }
        if let Some(notes) = &self.notes {
            reading.notes = notes.clone();
        }
        if let Some(highlights) = &self.highlights {
            reading.highlights = highlights.clone();
        }
        if let Some(tags) = &self.tags {
            reading.tags = tags.clone();
        }
    }
}
