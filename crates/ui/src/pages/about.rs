use egui::RichText;
use questlog_protocol::ThemeToken;

use super::PageCtx;
use crate::theme;

pub fn show(ui: &mut egui::Ui, page: &PageCtx<'_>) {
    ui.add_space(page.slide_offset());
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 4.0);
        ui.label(
            RichText::new(page.t("about_page"))
                .size(theme::FONT_TITLE * 1.4)
                .strong()
                .color(page.color(ThemeToken::TextPrimary)),
        );
        ui.add_space(12.0);
        ui.set_max_width(520.0);
        ui.label(
            RichText::new(page.t("about_body"))
                .size(theme::FONT_EMPHASIS)
                .color(page.color(ThemeToken::TextSecondary)),
        );
    });
}
