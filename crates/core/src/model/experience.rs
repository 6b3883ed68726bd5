use questlog_protocol::SharedStr;
use serde::{Deserialize, Serialize};

use super::entry::{Entry, Track};

/// A loaded experience document: the flat entry list plus optional tracks.
///
/// Entries keep document order. Tree structure is expressed through
/// `Entry::parent` and resolved by the layout pass, not stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub entries: Vec<Entry>,
    pub tracks: Vec<Track>,
}

impl Experience {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            tracks: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    /// Direct children of `parent`, or the roots when `parent` is `None`.
    ///
    /// An entry whose parent id does not resolve counts as a root.
    pub fn children(&self, parent: Option<&str>) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| match (parent, e.parent.as_deref()) {
                (None, None) => true,
                (None, Some(p)) => !self.contains(p),
                (Some(want), Some(p)) => want == p,
                (Some(_), None) => false,
            })
            .collect()
    }

    /// Distinct category tags in first-seen order. Track documents list
    /// their tracks first so empty tracks still show up.
    pub fn categories(&self) -> Vec<SharedStr> {
        let mut out: Vec<SharedStr> = self.tracks.iter().map(|t| t.id.clone()).collect();
        for e in &self.entries {
            if let Some(c) = &e.category
                && !out.contains(c)
            {
                out.push(c.clone());
            }
        }
        out
    }

    /// The subset belonging to `category`; `None` keeps everything.
    ///
    /// Children whose parent falls outside the subset become roots of the
    /// filtered experience.
    pub fn filter_category(&self, category: Option<&str>) -> Experience {
        let Some(category) = category else {
            return self.clone();
        };
        Experience {
            entries: self
                .entries
                .iter()
                .filter(|e| e.category.as_deref() == Some(category))
                .cloned()
                .collect(),
            tracks: self
                .tracks
                .iter()
                .filter(|t| t.id == category)
                .cloned()
                .collect(),
        }
    }
}
