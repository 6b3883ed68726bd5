//! Turning an experience into positioned nodes.
//!
//! ```text
//!   Experience ──▶ build_forest ──▶ Forest ──┬─▶ layout_tree     ──▶ TreeLayout
//!   (flat list,     (parent links,            │
//!    parent ids)     cycle check)             └─▶ layout_timeline ──▶ TimelineLayout
//! ```
//!
//! Both views share one forest derivation; a category switch or a view
//! switch recomputes the whole chain.

pub mod forest;
pub mod timeline;
pub mod tree;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Experience;

pub use forest::{Forest, build_forest};
pub use timeline::{DurationBar, Side, TimelineConfig, TimelineLayout, TimelineRow, layout_timeline};
pub use tree::{TreeConfig, TreeLayout, TreeNode, layout_tree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("malformed data: parent links form a cycle through {0:?}")]
    Cycle(String),
    #[error("malformed data: duplicate entry id {0:?}")]
    DuplicateId(String),
}

/// Which visualization the experience page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[default]
    Timeline,
    Tree,
}

impl ViewKind {
    pub fn toggled(self) -> Self {
        match self {
            Self::Timeline => Self::Tree,
            Self::Tree => Self::Timeline,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Tree => "tree",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "timeline" => Some(Self::Timeline),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

/// A computed layout for one view kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Tree(TreeLayout),
    Timeline(TimelineLayout),
}

impl Layout {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Tree(_) => ViewKind::Tree,
            Self::Timeline(_) => ViewKind::Timeline,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Tree(t) => t.nodes.len(),
            Self::Timeline(t) => t.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the full derivation for `kind`.
pub fn derive_layout(
    experience: &Experience,
    kind: ViewKind,
    tree: &TreeConfig,
    timeline: &TimelineConfig,
    now: NaiveDate,
) -> Result<Layout, LayoutError> {
    let forest = build_forest(experience)?;
    let layout = match kind {
        ViewKind::Tree => Layout::Tree(layout_tree(experience, &forest, tree)),
        ViewKind::Timeline => Layout::Timeline(layout_timeline(experience, &forest, timeline, now)),
    };
    tracing::debug!(view = kind.as_str(), nodes = layout.len(), "layout derived");
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    #[test]
    fn view_kind_round_trips_names() {
        for kind in [ViewKind::Timeline, ViewKind::Tree] {
            assert_eq!(ViewKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ViewKind::Tree.toggled(), ViewKind::Timeline);
        assert_eq!(ViewKind::parse("force"), None);
    }

    #[test]
    fn derive_reports_kind() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
        let exp = Experience::new(vec![Entry::new("a", "A", d)]);
        let tree = derive_layout(&exp, ViewKind::Tree, &TreeConfig::default(), &TimelineConfig::default(), d)
            .unwrap();
        assert_eq!(tree.kind(), ViewKind::Tree);
        assert_eq!(tree.len(), 1);
    }
}
