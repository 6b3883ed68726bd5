use egui::{Align2, FontId, Pos2, Rect, Sense, Vec2};
use questlog_core::fuzzy::{FuzzyConfig, ScanlineJitter};
use rand::rngs::SmallRng;

/// Height in points of one jittered band.
const STRIP: f32 = 2.0;

/// Text whose scanlines are shifted by a fresh random offset every frame.
pub struct FuzzyText {
    jitter: ScanlineJitter<SmallRng>,
}

impl FuzzyText {
    pub fn new(config: FuzzyConfig) -> Self {
        Self {
            jitter: ScanlineJitter::from_entropy(config),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        text: &str,
        font_size: f32,
        color: egui::Color32,
    ) -> egui::Response {
        let galley = ui.painter().layout_no_wrap(
            text.to_string(),
            FontId::proportional(font_size),
            color,
        );
        let margin = self.jitter.config().margin as f32;
        let size = galley.size() + Vec2::new(margin * 2.0, 0.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());

        if self.jitter.config().enable_hover {
            self.jitter.set_hovered(response.hovered());
        }

        if ui.is_rect_visible(rect) {
            let text_rect = Align2::CENTER_CENTER.align_size_within_rect(galley.size(), rect);
            let rows = (text_rect.height() / STRIP).ceil() as usize;
            let offsets = self.jitter.frame(rows);
            let clip = ui.clip_rect();
            for (i, dx) in offsets.iter().enumerate() {
                let top = text_rect.top() + i as f32 * STRIP;
                let band = Rect::from_min_max(
                    Pos2::new(rect.left(), top),
                    Pos2::new(rect.right(), (top + STRIP).min(text_rect.bottom())),
                );
                let painter = ui.painter().with_clip_rect(band.intersect(clip));
                painter.galley(text_rect.min + Vec2::new(*dx as f32, 0.0), galley.clone(), color);
            }
            ui.ctx().request_repaint();
        }

        response
    }
}
