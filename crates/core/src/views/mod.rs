//! View transforms: layouts in, `RenderCommand` lists out.

pub mod period;
pub mod timeline;
pub mod tree;

use questlog_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport};

use crate::layout::Layout;
use crate::model::Experience;

pub use period::{format_duration, format_period};
pub use timeline::render_timeline;
pub use tree::render_tree;

/// Per-frame inputs shared by every view.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions<'a> {
    pub selected: Option<&'a str>,
    /// Shown instead of an end date for ongoing entries.
    pub present_label: &'a str,
}

impl ViewOptions<'_> {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected == Some(id)
    }
}

impl Default for ViewOptions<'_> {
    fn default() -> Self {
        Self {
            selected: None,
            present_label: "present",
        }
    }
}

pub fn render_layout(
    experience: &Experience,
    layout: &Layout,
    viewport: &Viewport,
    options: &ViewOptions<'_>,
) -> Vec<RenderCommand> {
    match layout {
        Layout::Tree(tree) => render_tree(experience, tree, viewport, options),
        Layout::Timeline(timeline) => render_timeline(experience, timeline, viewport, options),
    }
}

/// Centred message for when there is nothing to lay out.
pub fn render_empty_state(viewport: &Viewport, message: &str) -> Vec<RenderCommand> {
    let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
    vec![
        RenderCommand::BeginGroup {
            id: "empty".into(),
            label: None,
        },
        RenderCommand::DrawCircle {
            center: Point::new(center.x, center.y - 28.0),
            radius: 6.0,
            color: ThemeToken::EmptyState,
        },
        RenderCommand::DrawText {
            position: center,
            text: message.into(),
            color: ThemeToken::EmptyState,
            font_size: 14.0,
            align: TextAlign::Center,
        },
        RenderCommand::EndGroup,
    ]
}

/// Entry id of the topmost rect under `point` (viewport coordinates),
/// honouring transforms.
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<SharedStr> {
    let mut stack = vec![(0.0_f64, 0.0_f64, 1.0_f64, 1.0_f64)];
    let mut hit = None;
    for cmd in commands {
        let (tx, ty, sx, sy) = stack.last().copied().unwrap_or((0.0, 0.0, 1.0, 1.0));
        match cmd {
            RenderCommand::PushTransform { translate, scale } => {
                stack.push((
                    tx + translate.x * sx,
                    ty + translate.y * sy,
                    sx * scale.x,
                    sy * scale.y,
                ));
            }
            RenderCommand::PopTransform => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            RenderCommand::DrawRect {
                rect,
                entry_id: Some(id),
                ..
            } => {
                let x = rect.x * sx + tx;
                let y = rect.y * sy + ty;
                let (w, h) = (rect.w * sx, rect.h * sy);
                if point.x >= x && point.x <= x + w && point.y >= y && point.y <= y + h {
                    hit = Some(id.clone());
                }
            }
            _ => {}
        }
    }
    hit
}
