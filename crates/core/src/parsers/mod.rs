pub mod categories;
pub mod date;
pub mod quests;
pub mod tracks;

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Entry, Experience};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quests: {0}")]
    Quests(#[from] quests::QuestParseError),
    #[error("tracks: {0}")]
    Tracks(#[from] tracks::TrackParseError),
    #[error("categories: {0}")]
    Categories(#[from] categories::CategoryParseError),
    #[error("unable to detect experience document shape")]
    UnknownFormat,
}

/// Ids may be written as strings or numbers; both end up as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Int(i64),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
        }
    }
}

/// Returns the first repeated id, if any.
pub(crate) fn check_unique_ids(entries: &[Entry]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(entries.len());
    for e in entries {
        if !seen.insert(e.id.as_str()) {
            return Err(e.id.to_string());
        }
    }
    Ok(())
}

/// Detect the document shape and parse it.
///
/// Detection looks at the top-level JSON value:
/// 1. an object with `quests` is the quests shape,
/// 2. an object with `tracks` is the tracks shape,
/// 3. an object with `categories` is the categories shape,
/// 4. a top-level array is a bare quest list.
pub fn parse_auto(data: &[u8]) -> Result<Experience, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(data)?;

    if let Some(obj) = value.as_object() {
        if obj.get("quests").is_some_and(serde_json::Value::is_array) {
            return Ok(quests::parse_quests(data)?);
        }
        if obj.get("tracks").is_some_and(serde_json::Value::is_array) {
            return Ok(tracks::parse_tracks(data)?);
        }
        if obj.get("categories").is_some_and(serde_json::Value::is_array) {
            return Ok(categories::parse_categories(data)?);
        }
    }

    if value.is_array() {
        return Ok(quests::parse_quest_list(data)?);
    }

    Err(ParseError::UnknownFormat)
}

/// Parse `data`, degrading to an empty experience on any failure.
///
/// The experience page shows an empty state instead of an error, so the
/// reason is only logged.
pub fn load_or_empty(data: &[u8]) -> Experience {
    match parse_auto(data) {
        Ok(exp) => {
            tracing::info!(entries = exp.len(), tracks = exp.tracks.len(), "experience loaded");
            exp
        }
        Err(e) => {
            tracing::warn!(error = %e, "experience document rejected, showing empty state");
            Experience::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_quests_object() {
        let exp = parse_auto(br#"{"quests":[{"id":"a","title":"A","startDate":"2020"}]}"#);
        assert_eq!(exp.map(|e| e.len()).ok(), Some(1));
    }

    #[test]
    fn detects_tracks_object() {
        let exp = parse_auto(br#"{"tracks":[{"id":"t","items":[]}]}"#);
        assert_eq!(exp.map(|e| e.tracks.len()).ok(), Some(1));
    }

    #[test]
    fn detects_categories_object() {
        let exp = parse_auto(br#"{"categories":[{"id":"c","nodes":[{"id":"n","title":"N","startDate":"2020"}]}]}"#);
        assert_eq!(exp.map(|e| e.len()).ok(), Some(1));
    }

    #[test]
    fn detects_bare_array() {
        let exp = parse_auto(br#"[{"id":1,"title":"A","startDate":"2020"}]"#);
        assert_eq!(exp.ok().and_then(|e| e.entries.first().map(|x| x.id.to_string())), Some("1".into()));
    }

    #[test]
    fn unknown_shape() {
        assert!(matches!(
            parse_auto(br#"{"jobs":[]}"#),
            Err(ParseError::UnknownFormat)
        ));
        assert!(matches!(parse_auto(b"42"), Err(ParseError::UnknownFormat)));
    }

    #[test]
    fn malformed_data_degrades_to_empty() {
        assert!(load_or_empty(b"<html>502 Bad Gateway</html>").is_empty());
        assert!(load_or_empty(br#"{"quests":[{"id":"a"}]}"#).is_empty());
        assert!(load_or_empty(b"").is_empty());
    }
}
