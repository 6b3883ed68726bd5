use questlog_protocol::{Point, Rect, RenderCommand, ThemeToken, Viewport};

use crate::layout::TreeLayout;
use crate::model::Experience;

use super::ViewOptions;

/// Render the quest tree: connectors from each parent's bottom edge to its
/// children, then one labelled rect per node.
///
/// Layout coordinates are shifted by the viewport origin; nodes and
/// connectors entirely outside the viewport are skipped.
pub fn render_tree(
    experience: &Experience,
    layout: &TreeLayout,
    viewport: &Viewport,
    options: &ViewOptions<'_>,
) -> Vec<RenderCommand> {
    if layout.nodes.is_empty() {
        return Vec::new();
    }

    let visible = Rect::new(viewport.x, viewport.y, viewport.width, viewport.height);
    let mut commands = Vec::with_capacity(layout.nodes.len() * 2 + 4);

    commands.push(RenderCommand::BeginGroup {
        id: "tree".into(),
        label: Some("Quest tree".into()),
    });
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(-viewport.x, -viewport.y),
        scale: Point::new(1.0, 1.0),
    });

    // Connectors first so node rects paint over them.
    for node in &layout.nodes {
        let Some(parent) = node.parent.and_then(|p| layout.nodes.get(p)) else {
            continue;
        };
        let from = Point::new(parent.x, parent.y + layout.config.node_height);
        let to = Point::new(node.x, node.y);
        let bounds = Rect::new(
            from.x.min(to.x),
            from.y,
            (from.x - to.x).abs().max(1.0),
            (to.y - from.y).max(1.0),
        );
        if !bounds.intersects(&visible) {
            continue;
        }
        // Elbow: down, across, down.
        let mid_y = (from.y + to.y) / 2.0;
        for (a, b) in [
            (from, Point::new(from.x, mid_y)),
            (Point::new(from.x, mid_y), Point::new(to.x, mid_y)),
            (Point::new(to.x, mid_y), to),
        ] {
            commands.push(RenderCommand::DrawLine {
                from: a,
                to: b,
                color: ThemeToken::Connector,
                width: 1.5,
            });
        }
    }

    for node in &layout.nodes {
        let rect = layout.node_rect(node);
        if !rect.intersects(&visible) {
            continue;
        }
        let Some(entry) = experience.entries.get(node.entry) else {
            continue;
        };
        let selected = options.is_selected(&entry.id);
        commands.push(RenderCommand::DrawRect {
            rect,
            color: if entry.is_ongoing() {
                ThemeToken::QuestOngoing
            } else {
                ThemeToken::for_category(entry.category.as_deref())
            },
            border_color: Some(if selected {
                ThemeToken::SelectionHighlight
            } else {
                ThemeToken::Border
            }),
            label: Some(entry.title.clone()),
            entry_id: Some(entry.id.clone()),
        });
    }

    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{TreeConfig, build_forest, layout_tree};
    use crate::model::Entry;
    use chrono::NaiveDate;
    use questlog_protocol::SharedStr;

    fn experience() -> Experience {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
        let mut child = Entry::new("child", "Child", d);
        child.parent = Some(SharedStr::from("root"));
        child.end = Some(d);
        let mut root = Entry::new("root", "Root", d);
        root.end = Some(d);
        root.category = Some("main".into());
        Experience::new(vec![root, child])
    }

    fn render(vp: Viewport, selected: Option<&str>) -> Vec<RenderCommand> {
        let exp = experience();
        let forest = build_forest(&exp).unwrap();
        let layout = layout_tree(&exp, &forest, &TreeConfig::default());
        render_tree(
            &exp,
            &layout,
            &vp,
            &ViewOptions {
                selected,
                present_label: "present",
            },
        )
    }

    fn rect_ids(cmds: &[RenderCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| c.entry_id().map(SharedStr::as_str))
            .collect()
    }

    #[test]
    fn one_rect_per_node_and_connectors() {
        let cmds = render(Viewport::new(800.0, 600.0), None);
        assert_eq!(rect_ids(&cmds), vec!["root", "child"]);
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        assert_eq!(lines, 3);
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }

    #[test]
    fn selection_gets_highlight_border() {
        let cmds = render(Viewport::new(800.0, 600.0), Some("child"));
        let border = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                entry_id: Some(id),
                border_color,
                ..
            } if id == "child" => *border_color,
            _ => None,
        });
        assert_eq!(border, Some(ThemeToken::SelectionHighlight));
    }

    #[test]
    fn culls_nodes_below_viewport() {
        let mut vp = Viewport::new(800.0, 50.0);
        vp.y = 0.0;
        let cmds = render(vp, None);
        assert_eq!(rect_ids(&cmds), vec!["root"]);
    }
}
