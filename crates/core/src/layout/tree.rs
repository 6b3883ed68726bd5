use questlog_protocol::{Rect, SharedStr};
use serde::{Deserialize, Serialize};

use crate::model::Experience;

use super::forest::Forest;

/// Spacing for the quest tree, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Horizontal distance between neighbouring leaf slots.
    pub sibling_spacing: f64,
    /// Vertical distance between depth levels.
    pub level_spacing: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: 180.0,
            level_spacing: 110.0,
            node_width: 160.0,
            node_height: 44.0,
        }
    }
}

/// One laid-out entry. `x` is the node's horizontal centre, `y` its top.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Index into `Experience::entries`.
    pub entry: usize,
    pub id: SharedStr,
    pub depth: u32,
    pub x: f64,
    pub y: f64,
    /// Index of the parent node in `TreeLayout::nodes`.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    /// Nodes in pre-order: every parent precedes its children.
    pub nodes: Vec<TreeNode>,
    pub width: f64,
    pub height: f64,
    pub config: TreeConfig,
}

impl TreeLayout {
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_rect(&self, node: &TreeNode) -> Rect {
        let c = &self.config;
        Rect::new(node.x - c.node_width / 2.0, node.y, c.node_width, c.node_height)
    }
}

/// Lay the forest out top-down.
///
/// Leaves take consecutive slots from left to right in pre-order, each
/// parent is centred between its first and last child, and depth maps to
/// the vertical offset. Produces exactly one node per entry.
pub fn layout_tree(experience: &Experience, forest: &Forest, config: &TreeConfig) -> TreeLayout {
    let n = experience.entries.len();
    let mut x = vec![0.0_f64; n];

    let mut next_slot = 0usize;
    for &i in forest.preorder() {
        if forest.children(i).is_empty() {
            x[i] = next_slot as f64 * config.sibling_spacing + config.node_width / 2.0;
            next_slot += 1;
        }
    }

    // Reverse pre-order visits every child before its parent.
    for &i in forest.preorder().iter().rev() {
        let kids = forest.children(i);
        if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
            x[i] = (x[first] + x[last]) / 2.0;
        }
    }

    let mut node_of = vec![0usize; n];
    for (pos, &i) in forest.preorder().iter().enumerate() {
        node_of[i] = pos;
    }

    let nodes: Vec<TreeNode> = forest
        .preorder()
        .iter()
        .map(|&i| {
            let depth = forest.depth(i);
            TreeNode {
                entry: i,
                id: experience.entries[i].id.clone(),
                depth,
                x: x[i],
                y: f64::from(depth) * config.level_spacing,
                parent: forest.parent(i).map(|p| node_of[p]),
            }
        })
        .collect();

    let width = if next_slot == 0 {
        0.0
    } else {
        (next_slot - 1) as f64 * config.sibling_spacing + config.node_width
    };
    let height = if nodes.is_empty() {
        0.0
    } else {
        f64::from(forest.max_depth()) * config.level_spacing + config.node_height
    };

    TreeLayout {
        nodes,
        width,
        height,
        config: *config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::forest::build_forest;
    use crate::model::Entry;
    use chrono::NaiveDate;

    fn e(id: &str, parent: Option<&str>, month: u32) -> Entry {
        let mut entry = Entry::new(
            id,
            id,
            NaiveDate::from_ymd_opt(2020, month, 1).unwrap_or_default(),
        );
        entry.parent = parent.map(SharedStr::from);
        entry
    }

    fn layout(entries: Vec<Entry>) -> TreeLayout {
        let exp = Experience::new(entries);
        let forest = build_forest(&exp).unwrap();
        layout_tree(&exp, &forest, &TreeConfig::default())
    }

    #[test]
    fn parent_centred_over_children() {
        let t = layout(vec![
            e("root", None, 1),
            e("a", Some("root"), 2),
            e("b", Some("root"), 3),
            e("c", Some("root"), 4),
        ]);
        let root = t.node("root").unwrap();
        let a = t.node("a").unwrap();
        let c = t.node("c").unwrap();
        assert!((root.x - (a.x + c.x) / 2.0).abs() < 1e-9);
        assert!(a.x < t.node("b").unwrap().x);
        assert_eq!(a.depth, 1);
        assert!((a.y - 110.0).abs() < 1e-9);
        assert_eq!(a.parent, Some(0));
    }

    #[test]
    fn single_node_dimensions() {
        let t = layout(vec![e("solo", None, 1)]);
        assert_eq!(t.nodes.len(), 1);
        assert!((t.width - 160.0).abs() < 1e-9);
        assert!((t.height - 44.0).abs() < 1e-9);
        let r = t.node_rect(&t.nodes[0]);
        assert!((r.x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn empty_layout() {
        let t = layout(vec![]);
        assert!(t.nodes.is_empty());
        assert_eq!(t.width, 0.0);
        assert_eq!(t.height, 0.0);
    }

    #[test]
    fn subtrees_do_not_overlap() {
        let t = layout(vec![
            e("r1", None, 1),
            e("r1a", Some("r1"), 2),
            e("r1b", Some("r1"), 3),
            e("r2", None, 4),
            e("r2a", Some("r2"), 5),
        ]);
        let right_edge_r1 = t.node("r1b").unwrap().x;
        assert!(t.node("r2a").unwrap().x > right_edge_r1);
        assert!(t.node("r2").unwrap().x > t.node("r1").unwrap().x);
    }
}
