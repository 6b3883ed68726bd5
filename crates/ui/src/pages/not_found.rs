use egui::RichText;
use questlog_core::fuzzy::FuzzyConfig;
use questlog_protocol::ThemeToken;

use super::PageCtx;
use crate::fuzzy_text::FuzzyText;
use crate::theme;

pub struct NotFoundPage {
    code: FuzzyText,
    message: FuzzyText,
}

impl NotFoundPage {
    pub fn new(base: FuzzyConfig) -> Self {
        Self {
            code: FuzzyText::new(FuzzyConfig {
                base_intensity: 0.1,
                hover_intensity: 0.3,
                ..base
            }),
            message: FuzzyText::new(FuzzyConfig {
                base_intensity: 0.01,
                hover_intensity: 0.2,
                ..base
            }),
        }
    }

    /// Returns `true` when "go home" was clicked.
    pub fn show(&mut self, ui: &mut egui::Ui, page: &PageCtx<'_>) -> bool {
        let mut go_home = false;
        ui.add_space(page.slide_offset());
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 5.0);
            ui.label(
                RichText::new("⚠")
                    .size(theme::FONT_DISPLAY)
                    .color(ui.visuals().error_fg_color.gamma_multiply(page.opacity)),
            );
            self.code
                .show(ui, "404", theme::FONT_DISPLAY * 1.5, page.color(ThemeToken::TextPrimary));
            self.message.show(
                ui,
                page.t("not_found_message"),
                theme::FONT_EMPHASIS,
                page.color(ThemeToken::TextSecondary),
            );
            ui.add_space(18.0);
            go_home = ui
                .button(RichText::new(page.t("go_home")).size(theme::FONT_EMPHASIS))
                .clicked();
        });
        go_home
    }
}
