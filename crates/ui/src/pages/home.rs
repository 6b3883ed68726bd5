use egui::{Align, Layout, RichText};
use questlog_core::fuzzy::FuzzyConfig;
use questlog_protocol::ThemeToken;

use super::PageCtx;
use crate::fuzzy_text::FuzzyText;
use crate::theme;

pub struct HomePage {
    name: FuzzyText,
}

impl HomePage {
    pub fn new(fuzzy: FuzzyConfig) -> Self {
        Self {
            name: FuzzyText::new(fuzzy),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, page: &PageCtx<'_>, display_name: &str) {
        let full = ui.available_rect_before_wrap();
        ui.add_space(page.slide_offset());
        ui.vertical_centered(|ui| {
            ui.add_space(full.height() / 3.0);
            ui.label(
                RichText::new(page.t("welcome_message"))
                    .size(theme::FONT_TITLE * 1.4)
                    .color(page.color(ThemeToken::TextPrimary)),
            );
        });

        // Name pinned to the bottom edge.
        ui.with_layout(Layout::bottom_up(Align::Center), |ui| {
            let size = (full.width() / 6.0).clamp(48.0, theme::FONT_DISPLAY * 2.5);
            self.name
                .show(ui, display_name, size, page.color(ThemeToken::TextMuted));
        });
    }
}
