use chrono::NaiveDate;
use questlog_protocol::{Color, SharedStr};
use serde::{Deserialize, Serialize};

/// One career or project entry ("quest").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier within the loaded document.
    pub id: SharedStr,
    pub title: SharedStr,
    pub description: String,
    pub start: NaiveDate,
    /// `None` means ongoing ("present").
    pub end: Option<NaiveDate>,
    /// Id of the parent entry, if this entry hangs under another one.
    pub parent: Option<SharedStr>,
    pub image: Option<String>,
    pub url: Option<String>,
    /// Category tag: `"main"` / `"side"` for quest documents, the owning
    /// track id for track documents.
    pub category: Option<SharedStr>,
    /// Explicit sibling ordering hint. Wins over start date when present.
    pub order: Option<i64>,
    pub skills: Vec<String>,
}

impl Entry {
    /// Minimal entry with only the required fields set.
    pub fn new(id: impl Into<SharedStr>, title: impl Into<SharedStr>, start: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            start,
            end: None,
            parent: None,
            image: None,
            url: None,
            category: None,
            order: None,
            skills: Vec::new(),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// End date used for measuring: the real end, or `now` when ongoing.
    pub fn effective_end(&self, now: NaiveDate) -> NaiveDate {
        self.end.unwrap_or(now)
    }

    /// Elapsed whole days between start and the effective end. Negative when
    /// the document lists an end before the start.
    pub fn elapsed_days(&self, now: NaiveDate) -> i64 {
        (self.effective_end(now) - self.start).num_days()
    }
}

/// A colored lane that groups entries in track-shaped documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: SharedStr,
    pub label: Option<String>,
    pub color: Option<Color>,
}

impl Track {
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}
