use serde::Deserialize;
use thiserror::Error;

use super::date::{DateError, parse_date, parse_end_date};
use super::{RawId, check_unique_ids};
use crate::model::{Entry, Experience};

#[derive(Debug, Error)]
pub enum QuestParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quest {id:?}: {source}")]
    Date {
        id: String,
        #[source]
        source: DateError,
    },
    #[error("duplicate quest id {0:?}")]
    DuplicateId(String),
}

/// `{ "quests": [ ... ] }` document.
#[derive(Debug, Deserialize)]
struct QuestFile {
    quests: Vec<RawQuest>,
}

/// A single quest as written in the JSON. Everything except id, title and
/// start date is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuest {
    id: RawId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "start")]
    start_date: String,
    #[serde(default, alias = "end")]
    end_date: Option<String>,
    #[serde(default, alias = "parent")]
    father: Option<RawId>,
    #[serde(default, rename = "type", alias = "category")]
    kind: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    order: Option<i64>,
    #[serde(default)]
    skills: Vec<String>,
}

impl RawQuest {
    fn into_entry(self) -> Result<Entry, QuestParseError> {
        let id = self.id.into_string();
        let date_err = |source| QuestParseError::Date {
            id: id.clone(),
            source,
        };
        let start = parse_date(&self.start_date).map_err(date_err)?;
        let end = parse_end_date(self.end_date.as_deref()).map_err(date_err)?;

        Ok(Entry {
            title: self.title.into(),
            description: self.description,
            start,
            end,
            parent: self.father.map(|p| p.into_string().into()),
            image: self.image.filter(|s| !s.is_empty()),
            url: self.url.filter(|s| !s.is_empty()),
            category: self.kind.filter(|s| !s.is_empty()).map(Into::into),
            order: self.order,
            skills: self.skills,
            id: id.into(),
        })
    }
}

/// Parse the quests shape: `{ "quests": [...] }`.
pub fn parse_quests(data: &[u8]) -> Result<Experience, QuestParseError> {
    let file: QuestFile = serde_json::from_slice(data)?;
    convert(file.quests)
}

/// Parse a bare top-level array of quests.
pub fn parse_quest_list(data: &[u8]) -> Result<Experience, QuestParseError> {
    let quests: Vec<RawQuest> = serde_json::from_slice(data)?;
    convert(quests)
}

fn convert(quests: Vec<RawQuest>) -> Result<Experience, QuestParseError> {
    let entries = quests
        .into_iter()
        .map(RawQuest::into_entry)
        .collect::<Result<Vec<_>, _>>()?;
    check_unique_ids(&entries).map_err(QuestParseError::DuplicateId)?;
    Ok(Experience::new(entries))
}
