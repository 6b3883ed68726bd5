use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use questlog_core::prefs::Theme;
use questlog_protocol::{RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::theme;

/// Transform state for PushTransform/PopTransform.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }

    fn apply_x(&self, x: f64) -> f32 {
        (x * self.sx + self.tx) as f32
    }

    fn apply_y(&self, y: f64) -> f32 {
        (y * self.sy + self.ty) as f32
    }

    fn scale_w(&self, w: f64) -> f32 {
        (w * self.sx) as f32
    }

    fn scale_h(&self, h: f64) -> f32 {
        (h * self.sy) as f32
    }
}

/// Screen rect of an entry that can be clicked or hovered.
pub struct HitRegion {
    pub rect: Rect,
    pub entry_id: SharedStr,
    pub label: Option<SharedStr>,
}

/// Result of rendering a command list: includes hit regions for interaction.
pub struct RenderResult {
    pub hit_regions: Vec<HitRegion>,
}

impl RenderResult {
    /// Topmost entry under `pos`.
    pub fn hit(&self, pos: Pos2) -> Option<&HitRegion> {
        self.hit_regions.iter().rev().find(|h| h.rect.contains(pos))
    }
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area.
/// `opacity` fades everything during page transitions.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    theme_kind: Theme,
    opacity: f32,
) -> RenderResult {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut clip_stack: Vec<Rect> = Vec::new();
    let mut hit_regions: Vec<HitRegion> = Vec::new();
    let color = |token: ThemeToken| theme::resolve_faded(token, theme_kind, opacity);

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color: fill,
                border_color,
                label,
                entry_id,
            } => {
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);

                if w < 0.5 || h < 0.5 {
                    continue;
                }

                let egui_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));

                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                let radius = CornerRadius::same(4);
                painter.rect_filled(egui_rect, radius, color(*fill));

                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        radius,
                        Stroke::new(2.0, color(*bc)),
                        StrokeKind::Outside,
                    );
                }

                if let Some(label_text) = label {
                    let label_str: &str = label_text;
                    if !label_str.is_empty() && w > 6.0 && h > 8.0 {
                        let font_size = (h - 6.0).clamp(8.0, 13.0);
                        let text_color = color(ThemeToken::TextPrimary);
                        let text_rect = egui_rect.shrink2(egui::vec2(6.0, 0.0));
                        let galley = painter.layout_no_wrap(
                            label_str.to_string(),
                            FontId::proportional(font_size),
                            text_color,
                        );
                        // Truncate: only draw if text fits
                        if galley.size().x <= text_rect.width() + 2.0 {
                            let text_pos = Pos2::new(
                                text_rect.left(),
                                text_rect.center().y - galley.size().y / 2.0,
                            );
                            painter.galley(text_pos, galley, text_color);
                        }
                    }
                }

                if let Some(id) = entry_id {
                    hit_regions.push(HitRegion {
                        rect: egui_rect,
                        entry_id: id.clone(),
                        label: label.clone(),
                    });
                }
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                color: fill,
            } => {
                let c = Pos2::new(tf.apply_x(center.x) + offset.x, tf.apply_y(center.y) + offset.y);
                let r = tf.scale_w(*radius);
                if r < 0.5 {
                    continue;
                }
                painter.circle_filled(c, r, color(*fill));
            }

            RenderCommand::DrawText {
                position,
                text,
                color: text_token,
                font_size,
                align,
            } => {
                let x = tf.apply_x(position.x) + offset.x;
                let y = tf.apply_y(position.y) + offset.y;
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }

                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };

                painter.text(
                    Pos2::new(x, y),
                    anchor,
                    text.as_str(),
                    FontId::proportional(size),
                    color(*text_token),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color: line_token,
                width,
            } => {
                let p1 = Pos2::new(tf.apply_x(from.x) + offset.x, tf.apply_y(from.y) + offset.y);
                let p2 = Pos2::new(tf.apply_x(to.x) + offset.x, tf.apply_y(to.y) + offset.y);
                painter.line_segment([p1, p2], Stroke::new(*width as f32, color(*line_token)));
            }

            RenderCommand::SetClip { rect } => {
                let x = tf.apply_x(rect.x) + offset.x;
                let y = tf.apply_y(rect.y) + offset.y;
                let w = tf.scale_w(rect.w);
                let h = tf.scale_h(rect.h);
                let clip_rect = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(clip_rect);
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.sx,
                    ty: parent.ty + translate.y * parent.sy,
                    sx: parent.sx * scale.x,
                    sy: parent.sy * scale.y,
                });
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic, no visual effect in egui
            }
        }
    }

    RenderResult { hit_regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_protocol::Point;

    fn rect(x: f64, id: &str) -> RenderCommand {
        RenderCommand::DrawRect {
            rect: questlog_protocol::Rect::new(x, 0.0, 100.0, 20.0),
            color: ThemeToken::QuestMain,
            border_color: None,
            label: None,
            entry_id: Some(id.into()),
        }
    }

    #[test]
    fn hit_regions_follow_transforms_and_paint_order() {
        let ctx = egui::Context::default();
        let clip = Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 300.0));
        let mut painter = egui::Painter::new(ctx, egui::LayerId::background(), clip);
        let commands = vec![
            RenderCommand::PushTransform {
                translate: Point::new(10.0, 0.0),
                scale: Point::new(1.0, 1.0),
            },
            rect(0.0, "a"),
            rect(50.0, "b"),
            RenderCommand::PopTransform,
        ];
        let result = render_commands(&mut painter, &commands, Pos2::new(5.0, 5.0), Theme::Light, 1.0);

        assert_eq!(result.hit_regions.len(), 2);
        let at = |x: f32| result.hit(Pos2::new(x, 15.0)).map(|h| h.entry_id.as_str().to_string());
        assert_eq!(at(25.0).as_deref(), Some("a"));
        // Overlap goes to the rect drawn last.
        assert_eq!(at(90.0).as_deref(), Some("b"));
        assert_eq!(at(300.0), None);
    }
}
