use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Entry, Experience};

use super::LayoutError;

/// Parent/child structure of an experience, resolved once per layout pass.
///
/// All indices point into `Experience::entries`. Children and roots are
/// already in sibling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    depth: Vec<u32>,
    preorder: Vec<usize>,
}

impl Forest {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[][..], Vec::as_slice)
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parent.get(index).copied().flatten()
    }

    pub fn depth(&self, index: usize) -> u32 {
        self.depth.get(index).copied().unwrap_or(0)
    }

    /// Every entry, parents before children, siblings in order.
    pub fn preorder(&self) -> &[usize] {
        &self.preorder
    }

    pub fn max_depth(&self) -> u32 {
        self.depth.iter().copied().max().unwrap_or(0)
    }

    /// Pre-order walk of the subtree rooted at `root`.
    pub fn subtree(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.children(i).iter().rev());
        }
        out
    }
}

/// Order between siblings: explicit order hints first (ascending), entries
/// without a hint after them by start date, document order as final tie-break.
pub fn sibling_order(entries: &[Entry], a: usize, b: usize) -> Ordering {
    let (ea, eb) = (&entries[a], &entries[b]);
    let by_hint = match (ea.order, eb.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_hint
        .then_with(|| ea.start.cmp(&eb.start))
        .then(a.cmp(&b))
}

/// Order between timeline roots: start date first, then order hint, then
/// document order.
pub fn chronological_order(entries: &[Entry], a: usize, b: usize) -> Ordering {
    let (ea, eb) = (&entries[a], &entries[b]);
    ea.start
        .cmp(&eb.start)
        .then_with(|| match (ea.order, eb.order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then(a.cmp(&b))
}

/// Resolve parent links into a forest.
///
/// Entries whose parent id is missing or unknown become roots. The
/// traversal keeps an explicit visited set, so parent cycles (including an
/// entry naming itself as parent) are reported as malformed data rather
/// than looping.
pub fn build_forest(experience: &Experience) -> Result<Forest, LayoutError> {
    let entries = &experience.entries;
    let n = entries.len();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
    for (i, e) in entries.iter().enumerate() {
        if index.insert(e.id.as_str(), i).is_some() {
            return Err(LayoutError::DuplicateId(e.id.to_string()));
        }
    }

    let parent: Vec<Option<usize>> = entries
        .iter()
        .map(|e| e.parent.as_deref().and_then(|p| index.get(p).copied()))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut roots = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }
    for list in &mut children {
        list.sort_by(|&a, &b| sibling_order(entries, a, b));
    }
    roots.sort_by(|&a, &b| sibling_order(entries, a, b));

    let mut visited = vec![false; n];
    let mut depth = vec![0u32; n];
    let mut preorder = Vec::with_capacity(n);
    let mut stack: Vec<(usize, u32)> = roots.iter().rev().map(|&r| (r, 0)).collect();

    while let Some((i, d)) = stack.pop() {
        if visited[i] {
            return Err(LayoutError::Cycle(entries[i].id.to_string()));
        }
        visited[i] = true;
        depth[i] = d;
        preorder.push(i);
        stack.extend(children[i].iter().rev().map(|&c| (c, d + 1)));
    }

    // Anything not reached from a root hangs on (or under) a cycle.
    if let Some(start) = visited.iter().position(|v| !v) {
        let culprit = find_cycle_member(&parent, start);
        return Err(LayoutError::Cycle(entries[culprit].id.to_string()));
    }

    tracing::debug!(entries = n, roots = roots.len(), "forest resolved");
    Ok(Forest {
        roots,
        children,
        parent,
        depth,
        preorder,
    })
}

/// Walk parent links from `start` until an index repeats.
fn find_cycle_member(parent: &[Option<usize>], start: usize) -> usize {
    let mut seen = vec![false; parent.len()];
    let mut i = start;
    loop {
        if seen[i] {
            return i;
        }
        seen[i] = true;
        match parent[i] {
            Some(p) => i = p,
            // Unreachable for nodes the root traversal missed, but stop
            // walking rather than guess.
            None => return i,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use questlog_protocol::SharedStr;

    fn e(id: &str, parent: Option<&str>, year: i32) -> Entry {
        let mut entry = Entry::new(
            id,
            id,
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default(),
        );
        entry.parent = parent.map(SharedStr::from);
        entry
    }

    fn ids(exp: &Experience, idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| exp.entries[i].id.to_string()).collect()
    }

    #[test]
    fn depths_and_preorder() {
        let exp = Experience::new(vec![
            e("job", None, 2018),
            e("team", Some("job"), 2019),
            e("project", Some("team"), 2020),
            e("school", None, 2012),
        ]);
        let f = build_forest(&exp).unwrap();
        assert_eq!(ids(&exp, f.roots()), vec!["school", "job"]);
        assert_eq!(ids(&exp, f.preorder()), vec!["school", "job", "team", "project"]);
        assert_eq!(f.depth(2), 2);
        assert_eq!(f.max_depth(), 2);
        assert_eq!(f.parent(2), Some(1));
    }

    #[test]
    fn order_hint_beats_start_date() {
        let mut a = e("a", None, 2010);
        let mut b = e("b", None, 2020);
        let c = e("c", None, 2000);
        a.order = Some(2);
        b.order = Some(1);
        let exp = Experience::new(vec![a, b, c]);
        let f = build_forest(&exp).unwrap();
        assert_eq!(ids(&exp, f.roots()), vec!["b", "a", "c"]);
    }

    #[test]
    fn unresolved_parent_is_root() {
        let exp = Experience::new(vec![e("a", Some("ghost"), 2020)]);
        let f = build_forest(&exp).unwrap();
        assert_eq!(f.roots(), &[0]);
        assert_eq!(f.depth(0), 0);
    }

    #[test]
    fn two_cycle_is_reported() {
        let exp = Experience::new(vec![
            e("root", None, 2020),
            e("a", Some("b"), 2020),
            e("b", Some("a"), 2020),
        ]);
        match build_forest(&exp) {
            Err(LayoutError::Cycle(id)) => assert!(id == "a" || id == "b", "{id}"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let exp = Experience::new(vec![e("loop", Some("loop"), 2020)]);
        assert_eq!(
            build_forest(&exp),
            Err(LayoutError::Cycle("loop".to_string()))
        );
    }

    #[test]
    fn entries_under_a_cycle_name_a_cycle_member() {
        let exp = Experience::new(vec![
            e("leaf", Some("a"), 2020),
            e("a", Some("b"), 2020),
            e("b", Some("a"), 2020),
        ]);
        match build_forest(&exp) {
            Err(LayoutError::Cycle(id)) => assert_ne!(id, "leaf"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids() {
        let exp = Experience::new(vec![e("x", None, 2020), e("x", None, 2021)]);
        assert_eq!(
            build_forest(&exp),
            Err(LayoutError::DuplicateId("x".to_string()))
        );
    }

    #[test]
    fn subtree_walk() {
        let exp = Experience::new(vec![
            e("r", None, 2020),
            e("c1", Some("r"), 2021),
            e("c2", Some("r"), 2022),
            e("g", Some("c1"), 2021),
        ]);
        let f = build_forest(&exp).unwrap();
        assert_eq!(ids(&exp, &f.subtree(0)), vec!["r", "c1", "g", "c2"]);
    }
}
