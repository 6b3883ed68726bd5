use chrono::NaiveDate;
use questlog_protocol::{Rect, SharedStr};
use serde::{Deserialize, Serialize};

use crate::model::Experience;

use super::forest::{Forest, chronological_order};

/// Scale and spacing for the zig-zag timeline, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Bar length per elapsed day.
    pub px_per_day: f64,
    /// Shortest bar drawn, so zero-length or inverted entries stay clickable.
    pub min_bar_width: f64,
    pub bar_height: f64,
    pub row_height: f64,
    /// Gap between the central axis and the start of a depth-0 bar.
    pub axis_gap: f64,
    /// Extra distance from the axis per depth level.
    pub indent_per_depth: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            px_per_day: 0.2,
            min_bar_width: 24.0,
            bar_height: 20.0,
            row_height: 52.0,
            axis_gap: 24.0,
            indent_per_depth: 28.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Roots alternate sides starting on the left.
    pub fn for_root(index: usize) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }
}

/// Horizontal extent of an entry's duration bar. `x` is relative to the
/// central axis and may be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationBar {
    pub x: f64,
    pub width: f64,
    /// Elapsed days as measured (negative for inverted dates).
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub entry: usize,
    pub id: SharedStr,
    pub depth: u32,
    /// Position of this row's root among the sorted roots.
    pub root_index: usize,
    pub side: Side,
    /// Top of the row.
    pub y: f64,
    pub bar: DurationBar,
    pub ongoing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub rows: Vec<TimelineRow>,
    pub height: f64,
    /// Largest distance any bar reaches from the axis.
    pub extent: f64,
    /// The date ongoing entries were measured against.
    pub now: NaiveDate,
    pub config: TimelineConfig,
}

impl TimelineLayout {
    pub fn row(&self, id: &str) -> Option<&TimelineRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Bar rectangle in axis-relative coordinates.
    pub fn bar_rect(&self, row: &TimelineRow) -> Rect {
        let c = &self.config;
        let top = row.y + (c.row_height - c.bar_height) / 2.0;
        Rect::new(row.bar.x, top, row.bar.width, c.bar_height)
    }
}

/// Bar length for `days` elapsed, never below the configured minimum.
pub fn bar_width(days: i64, config: &TimelineConfig) -> f64 {
    (days.max(0) as f64 * config.px_per_day).max(config.min_bar_width)
}

/// Lay entries out along a vertical axis.
///
/// Roots are sorted by start date and alternate left/right of the axis;
/// each root's descendants follow it on the same side, one row each,
/// pushed further from the axis by their depth. Ongoing entries are
/// measured up to `now`.
pub fn layout_timeline(
    experience: &Experience,
    forest: &Forest,
    config: &TimelineConfig,
    now: NaiveDate,
) -> TimelineLayout {
    let entries = &experience.entries;
    let mut roots = forest.roots().to_vec();
    roots.sort_by(|&a, &b| chronological_order(entries, a, b));

    let mut rows = Vec::with_capacity(entries.len());
    let mut extent: f64 = 0.0;

    for (root_index, &root) in roots.iter().enumerate() {
        let side = Side::for_root(root_index);
        for i in forest.subtree(root) {
            let entry = &entries[i];
            let depth = forest.depth(i);
            let days = entry.elapsed_days(now);
            let width = bar_width(days, config);
            let offset = config.axis_gap + f64::from(depth) * config.indent_per_depth;
            let x = match side {
                Side::Right => offset,
                Side::Left => -offset - width,
            };
            extent = extent.max(offset + width);

            rows.push(TimelineRow {
                entry: i,
                id: entry.id.clone(),
                depth,
                root_index,
                side,
                y: rows.len() as f64 * config.row_height,
                bar: DurationBar { x, width, days },
                ongoing: entry.is_ongoing(),
            });
        }
    }

    TimelineLayout {
        height: rows.len() as f64 * config.row_height,
        rows,
        extent,
        now,
        config: *config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::forest::build_forest;
    use crate::model::Entry;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn entry(id: &str, start: NaiveDate, end: Option<NaiveDate>, parent: Option<&str>) -> Entry {
        let mut e = Entry::new(id, id, start);
        e.end = end;
        e.parent = parent.map(SharedStr::from);
        e
    }

    fn layout(entries: Vec<Entry>, now: NaiveDate) -> TimelineLayout {
        let exp = Experience::new(entries);
        let forest = build_forest(&exp).unwrap();
        layout_timeline(&exp, &forest, &TimelineConfig::default(), now)
    }

    #[test]
    fn roots_zigzag_in_start_order() {
        let t = layout(
            vec![
                entry("c", ymd(2022, 1, 1), None, None),
                entry("a", ymd(2010, 1, 1), Some(ymd(2012, 1, 1)), None),
                entry("b", ymd(2015, 1, 1), Some(ymd(2016, 1, 1)), None),
            ],
            ymd(2024, 1, 1),
        );
        let order: Vec<_> = t.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        let sides: Vec<_> = t.rows.iter().map(|r| r.side).collect();
        assert_eq!(sides, vec![Side::Left, Side::Right, Side::Left]);
        assert!(t.rows[0].bar.x < 0.0);
        assert!(t.rows[1].bar.x > 0.0);
    }

    #[test]
    fn bar_length_tracks_duration() {
        let t = layout(
            vec![entry("a", ymd(2020, 1, 1), Some(ymd(2021, 1, 1)), None)],
            ymd(2024, 1, 1),
        );
        let row = &t.rows[0];
        assert_eq!(row.bar.days, 366);
        assert!((row.bar.width - 366.0 * 0.2).abs() < 1e-9);
        // Left side bars end at the axis gap.
        assert!((row.bar.x + row.bar.width + 24.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_dates_clamp_to_minimum() {
        let t = layout(
            vec![entry("x", ymd(2021, 1, 1), Some(ymd(2020, 1, 1)), None)],
            ymd(2024, 1, 1),
        );
        assert!(t.rows[0].bar.days < 0);
        assert!((t.rows[0].bar.width - 24.0).abs() < 1e-9);
    }

    #[test]
    fn ongoing_grows_with_now() {
        let entries = vec![entry("job", ymd(2023, 1, 1), None, None)];
        let early = layout(entries.clone(), ymd(2023, 6, 1));
        let late = layout(entries, ymd(2024, 6, 1));
        assert!(late.rows[0].bar.width >= early.rows[0].bar.width);
        assert!(late.rows[0].ongoing);
    }

    #[test]
    fn children_follow_root_side_and_indent() {
        let t = layout(
            vec![
                entry("r0", ymd(2010, 1, 1), Some(ymd(2011, 1, 1)), None),
                entry("r1", ymd(2012, 1, 1), Some(ymd(2014, 1, 1)), None),
                entry("r1c", ymd(2013, 1, 1), Some(ymd(2013, 1, 2)), Some("r1")),
            ],
            ymd(2024, 1, 1),
        );
        let child = t.row("r1c").unwrap();
        assert_eq!(child.side, Side::Right);
        assert_eq!(child.depth, 1);
        assert_eq!(child.root_index, 1);
        assert!((child.bar.x - (24.0 + 28.0)).abs() < 1e-9);
        assert!((child.y - 2.0 * 52.0).abs() < 1e-9);
        assert!((t.height - 3.0 * 52.0).abs() < 1e-9);
    }
}
