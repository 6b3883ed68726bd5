use questlog_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::layout::{Side, TimelineLayout};
use crate::model::Experience;

use super::ViewOptions;
use super::period::format_period;

const MARKER_RADIUS: f64 = 5.0;
const AXIS_WIDTH: f64 = 2.0;
const PERIOD_FONT_SIZE: f64 = 10.0;

/// Render the zig-zag timeline.
///
/// The axis sits at layout x = 0 and is drawn at the horizontal centre of
/// the viewport; `viewport.x` scrolls sideways from there. Each root gets a
/// marker on the axis, each entry a duration bar with its period printed
/// underneath. Rows outside the viewport are skipped.
pub fn render_timeline(
    experience: &Experience,
    layout: &TimelineLayout,
    viewport: &Viewport,
    options: &ViewOptions<'_>,
) -> Vec<RenderCommand> {
    if layout.rows.is_empty() {
        return Vec::new();
    }

    let config = &layout.config;
    let mut commands = Vec::with_capacity(layout.rows.len() * 4 + 6);

    commands.push(RenderCommand::BeginGroup {
        id: "timeline".into(),
        label: Some("Timeline".into()),
    });
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(viewport.width / 2.0 - viewport.x, -viewport.y),
        scale: Point::new(1.0, 1.0),
    });

    let axis_top = viewport.y.max(0.0);
    let axis_bottom = (viewport.y + viewport.height).min(layout.height);
    if axis_bottom > axis_top {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(0.0, axis_top),
            to: Point::new(0.0, axis_bottom),
            color: ThemeToken::Axis,
            width: AXIS_WIDTH,
        });
    }

    for row in &layout.rows {
        if !viewport.overlaps_y(row.y, row.y + config.row_height) {
            continue;
        }
        let Some(entry) = experience.entries.get(row.entry) else {
            continue;
        };
        let bar = layout.bar_rect(row);
        let mid_y = bar.y + bar.h / 2.0;
        let near_edge = match row.side {
            Side::Right => bar.x,
            Side::Left => bar.right(),
        };

        commands.push(RenderCommand::DrawLine {
            from: Point::new(0.0, mid_y),
            to: Point::new(near_edge, mid_y),
            color: ThemeToken::Connector,
            width: 1.0,
        });
        if row.depth == 0 {
            commands.push(RenderCommand::DrawCircle {
                center: Point::new(0.0, mid_y),
                radius: MARKER_RADIUS,
                color: ThemeToken::AxisMarker,
            });
        }

        let selected = options.is_selected(&entry.id);
        commands.push(RenderCommand::DrawRect {
            rect: bar,
            color: if row.ongoing {
                ThemeToken::QuestOngoing
            } else {
                ThemeToken::for_category(entry.category.as_deref())
            },
            border_color: selected.then_some(ThemeToken::SelectionHighlight),
            label: Some(entry.title.clone()),
            entry_id: Some(entry.id.clone()),
        });

        let (x, align) = match row.side {
            Side::Right => (bar.x, TextAlign::Left),
            Side::Left => (bar.right(), TextAlign::Right),
        };
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, bar.bottom() + PERIOD_FONT_SIZE),
            text: format_period(entry.start, entry.end, options.present_label).into(),
            color: ThemeToken::TextMuted,
            font_size: PERIOD_FONT_SIZE,
            align,
        });
    }

    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{TimelineConfig, build_forest, layout_timeline};
    use crate::model::Entry;
    use chrono::NaiveDate;
    use questlog_protocol::SharedStr;

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap_or_default()
    }

    fn experience() -> Experience {
        let mut a = Entry::new("a", "First", ymd(2015, 1));
        a.end = Some(ymd(2016, 1));
        let b = Entry::new("b", "Second", ymd(2018, 3));
        let mut c = Entry::new("c", "Nested", ymd(2018, 6));
        c.parent = Some(SharedStr::from("b"));
        c.end = Some(ymd(2019, 1));
        Experience::new(vec![a, b, c])
    }

    fn render(vp: Viewport, selected: Option<&str>) -> Vec<RenderCommand> {
        let exp = experience();
        let forest = build_forest(&exp).unwrap();
        let layout = layout_timeline(&exp, &forest, &TimelineConfig::default(), ymd(2024, 1));
        render_timeline(
            &exp,
            &layout,
            &vp,
            &ViewOptions {
                selected,
                present_label: "present",
            },
        )
    }

    #[test]
    fn markers_only_for_roots() {
        let cmds = render(Viewport::new(1000.0, 800.0), None);
        let markers = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawCircle { .. }))
            .count();
        assert_eq!(markers, 2);
        let bars: Vec<_> = cmds
            .iter()
            .filter_map(|c| c.entry_id().map(SharedStr::as_str))
            .collect();
        assert_eq!(bars, vec!["a", "b", "c"]);
    }

    #[test]
    fn ongoing_entry_has_present_label_and_colour() {
        let cmds = render(Viewport::new(1000.0, 800.0), None);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText { text, .. } if text.as_str() == "Mar 2018 – present"
        )));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawRect { color: ThemeToken::QuestOngoing, entry_id: Some(id), .. } if id == "b"
        )));
    }

    #[test]
    fn left_side_periods_align_right() {
        let cmds = render(Viewport::new(1000.0, 800.0), None);
        let first_align = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawText { align, .. } => Some(*align),
            _ => None,
        });
        assert_eq!(first_align, Some(TextAlign::Right));
    }

    #[test]
    fn culls_rows_outside_viewport() {
        let mut vp = Viewport::new(1000.0, 40.0);
        vp.y = 60.0;
        let cmds = render(vp, Some("b"));
        let bars: Vec<_> = cmds
            .iter()
            .filter_map(|c| c.entry_id().map(SharedStr::as_str))
            .collect();
        assert_eq!(bars, vec!["b"]);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawRect { border_color: Some(ThemeToken::SelectionHighlight), .. }
        )));
    }
}
