use questlog_protocol::{Color, SharedStr};
use serde::Deserialize;
use thiserror::Error;

use super::date::{DateError, parse_date, parse_end_date};
use super::{RawId, check_unique_ids};
use crate::model::{Entry, Experience, Track};

#[derive(Debug, Error)]
pub enum TrackParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("item {id:?}: {source}")]
    Date {
        id: String,
        #[source]
        source: DateError,
    },
    #[error("duplicate item id {0:?}")]
    DuplicateId(String),
}

/// `{ "tracks": [ { id, color, items: [...] } ] }` document.
#[derive(Debug, Deserialize)]
struct TrackFile {
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: RawId,
    #[serde(default, alias = "name")]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    id: RawId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "startDate")]
    start: String,
    #[serde(default, alias = "endDate")]
    end: Option<String>,
    #[serde(default)]
    parent: Option<RawId>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    order: Option<i64>,
}

/// Parse the tracks shape. Every item is tagged with its track id as its
/// category, and track colors are parsed when they are valid hex.
pub fn parse_tracks(data: &[u8]) -> Result<Experience, TrackParseError> {
    let file: TrackFile = serde_json::from_slice(data)?;

    let mut tracks = Vec::with_capacity(file.tracks.len());
    let mut entries = Vec::new();

    for raw_track in file.tracks {
        let track_id: SharedStr = raw_track.id.into_string().into();
        let color = raw_track.color.as_deref().and_then(|c| {
            let parsed = Color::from_hex(c);
            if parsed.is_none() {
                tracing::warn!(track = %track_id, color = c, "ignoring unparseable track color");
            }
            parsed
        });

        for item in raw_track.items {
            let id = item.id.into_string();
            let date_err = |source| TrackParseError::Date {
                id: id.clone(),
                source,
            };
            let start = parse_date(&item.start).map_err(date_err)?;
            let end = parse_end_date(item.end.as_deref()).map_err(date_err)?;

            entries.push(Entry {
                title: item.title.into(),
                description: item.description,
                start,
                end,
                parent: item.parent.map(|p| p.into_string().into()),
                image: item.image.filter(|s| !s.is_empty()),
                url: item.url.filter(|s| !s.is_empty()),
                category: Some(track_id.clone()),
                order: item.order,
                skills: item.skills,
                id: id.into(),
            });
        }

        tracks.push(Track {
            id: track_id,
            label: raw_track.label,
            color,
        });
    }

    check_unique_ids(&entries).map_err(TrackParseError::DuplicateId)?;
    Ok(Experience { entries, tracks })
}
