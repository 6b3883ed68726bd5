use std::collections::HashMap;

use questlog_protocol::SharedStr;
use serde::Deserialize;
use thiserror::Error;

use super::date::{DateError, parse_date, parse_end_date};
use super::{RawId, check_unique_ids};
use crate::model::{Entry, Experience, Track};

#[derive(Debug, Error)]
pub enum CategoryParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node {id:?}: {source}")]
    Date {
        id: String,
        #[source]
        source: DateError,
    },
    #[error("duplicate node id {0:?}")]
    DuplicateId(String),
}

/// `{ "categories": [ { id, title, nodes: [...] } ] }` document, where
/// nodes point forward at their successors through `next`.
#[derive(Debug, Deserialize)]
struct CategoryFile {
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: RawId,
    #[serde(default, alias = "name")]
    title: Option<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: RawId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "start")]
    start_date: String,
    #[serde(default, alias = "end")]
    end_date: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    next: Vec<RawId>,
}

/// Parse the categories shape. Each category becomes a track, and a node
/// listed in another node's `next` becomes that node's child. When several
/// nodes claim the same successor the first claim wins.
pub fn parse_categories(data: &[u8]) -> Result<Experience, CategoryParseError> {
    let file: CategoryFile = serde_json::from_slice(data)?;

    let mut tracks = Vec::with_capacity(file.categories.len());
    let mut entries = Vec::new();

    for category in file.categories {
        let category_id: SharedStr = category.id.into_string().into();
        let first = entries.len();
        let mut parent_of: HashMap<String, SharedStr> = HashMap::new();

        for node in category.nodes {
            let id = node.id.into_string();
            let date_err = |source| CategoryParseError::Date {
                id: id.clone(),
                source,
            };
            let start = parse_date(&node.start_date).map_err(date_err)?;
            let end = parse_end_date(node.end_date.as_deref()).map_err(date_err)?;

            let id: SharedStr = id.into();
            for next in node.next {
                let next = next.into_string();
                if let Some(existing) = parent_of.get(&next) {
                    tracing::warn!(
                        node = %next,
                        kept = %existing,
                        ignored = %id,
                        "node has several predecessors, keeping the first"
                    );
                    continue;
                }
                parent_of.insert(next, id.clone());
            }

            let mut entry = Entry::new(id, node.title, start);
            entry.description = node.description;
            entry.end = end;
            entry.image = node.image.filter(|s| !s.is_empty());
            entry.url = node.url.filter(|s| !s.is_empty());
            entry.category = Some(category_id.clone());
            entries.push(entry);
        }

        for entry in &mut entries[first..] {
            entry.parent = parent_of.get(entry.id.as_str()).cloned();
        }

        tracks.push(Track {
            id: category_id,
            label: category.title,
            color: None,
        });
    }

    check_unique_ids(&entries).map_err(CategoryParseError::DuplicateId)?;
    Ok(Experience { entries, tracks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_links_become_parents() {
        let json = br#"{ "categories": [
            { "id": "work", "title": "Work", "nodes": [
                { "id": "intern", "title": "Intern", "startDate": "2017-06", "endDate": "2017-09",
                  "next": ["junior"] },
                { "id": "junior", "title": "Junior dev", "startDate": "2018-01", "next": ["senior"] },
                { "id": "senior", "title": "Senior dev", "startDate": "2021-01" }
            ] },
            { "id": "study", "nodes": [
                { "id": 1, "title": "BSc", "startDate": "2014", "endDate": "2017" }
            ] }
        ] }"#;
        let exp = parse_categories(json).unwrap();
        assert_eq!(exp.len(), 4);
        assert_eq!(exp.entry("intern").and_then(|e| e.parent.as_deref()), None);
        assert_eq!(exp.entry("junior").and_then(|e| e.parent.as_deref()), Some("intern"));
        assert_eq!(exp.entry("senior").and_then(|e| e.parent.as_deref()), Some("junior"));
        assert_eq!(exp.entry("1").and_then(|e| e.category.as_deref()), Some("study"));
        assert_eq!(exp.tracks.len(), 2);
        assert_eq!(exp.tracks[0].display_name(), "Work");
    }

    #[test]
    fn first_predecessor_wins() {
        let json = br#"{ "categories": [ { "id": "c", "nodes": [
            { "id": "a", "title": "A", "startDate": "2020", "next": ["c1"] },
            { "id": "b", "title": "B", "startDate": "2020", "next": ["c1"] },
            { "id": "c1", "title": "C", "startDate": "2021" }
        ] } ] }"#;
        let exp = parse_categories(json).unwrap();
        assert_eq!(exp.entry("c1").and_then(|e| e.parent.as_deref()), Some("a"));
    }

    #[test]
    fn duplicate_ids_across_categories_rejected() {
        let json = br#"{ "categories": [
            { "id": "x", "nodes": [ { "id": "n", "title": "N", "startDate": "2020" } ] },
            { "id": "y", "nodes": [ { "id": "n", "title": "N", "startDate": "2020" } ] }
        ] }"#;
        assert!(matches!(
            parse_categories(json),
            Err(CategoryParseError::DuplicateId(id)) if id == "n"
        ));
    }
}
