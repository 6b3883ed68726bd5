//! Top navigation bar: route links, language picker, theme button and the
//! cursor-effect toggle. Icon controls carry a delayed tooltip.

use std::time::Duration;

use egui::{Align, Area, Frame, Id, Layout, Order, RichText};
use questlog_core::prefs::{PreferenceStore, Theme, ThemeMode};
use questlog_core::routes::Route;
use questlog_core::tooltip::DelayedTooltip;
use questlog_protocol::ThemeToken;

use crate::i18n::{self, t};
use crate::theme;

/// What the user asked for this frame. Applied by the app after the bar
/// is drawn, so the bar only borrows the preference store immutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Navigate(Route),
    SetLanguage(String),
    CycleTheme,
    ToggleCursor,
}

#[derive(Debug, Clone, Copy)]
enum Control {
    Language,
    Theme,
    Cursor,
}

pub struct NavBar {
    language_tip: DelayedTooltip,
    theme_tip: DelayedTooltip,
    cursor_tip: DelayedTooltip,
    language_query: String,
}

impl NavBar {
    pub fn new(tooltip_delay_ms: u64) -> Self {
        Self {
            language_tip: DelayedTooltip::from_millis(tooltip_delay_ms),
            theme_tip: DelayedTooltip::from_millis(tooltip_delay_ms),
            cursor_tip: DelayedTooltip::from_millis(tooltip_delay_ms),
            language_query: String::new(),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        brand: &str,
        prefs: &PreferenceStore,
        current: Route,
        now: Duration,
    ) -> Vec<NavAction> {
        let mut actions = Vec::new();
        let lang = prefs.language();
        let visuals = prefs.effective_theme();

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(brand)
                    .size(theme::FONT_EMPHASIS)
                    .strong()
                    .color(theme::resolve(ThemeToken::NavText, visuals)),
            );
            ui.separator();

            for route in Route::NAV {
                let active = current == route;
                let color = if active {
                    theme::resolve(ThemeToken::NavActive, visuals)
                } else {
                    theme::resolve(ThemeToken::NavText, visuals)
                };
                let label = RichText::new(t(lang, route.label_key())).color(color);
                if ui
                    .add(egui::Button::new(label).selected(active).frame(false))
                    .clicked()
                    && !active
                {
                    actions.push(NavAction::Navigate(route));
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                // Right to left: cursor, theme, language.
                let capable = prefs.cursor_toggle_enabled();
                let cursor = ui.add_enabled(
                    capable,
                    egui::Button::new("✨").selected(prefs.cursor_effect()),
                );
                if cursor.clicked() {
                    actions.push(NavAction::ToggleCursor);
                }
                let cursor_text = if capable {
                    t(lang, "cursor_toggle")
                } else {
                    t(lang, "cursor_unavailable")
                };
                self.tooltip(ui, Control::Cursor, &cursor, cursor_text, visuals, now);

                let (icon, tip_key) = theme_button(prefs.theme_mode());
                let theme_btn = ui.button(icon);
                if theme_btn.clicked() {
                    actions.push(NavAction::CycleTheme);
                }
                self.tooltip(ui, Control::Theme, &theme_btn, t(lang, tip_key), visuals, now);

                let combo = egui::ComboBox::from_id_salt("language")
                    .selected_text(i18n::language_name(lang))
                    .show_ui(ui, |ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.language_query)
                                .hint_text(t(lang, "search_language"))
                                .desired_width(120.0),
                        );
                        let mut picked = None;
                        for (code, name) in i18n::filter_languages(prefs.languages(), &self.language_query) {
                            if ui.selectable_label(code == lang, name).clicked() {
                                picked = Some(code.to_string());
                            }
                        }
                        picked
                    });
                if let Some(Some(code)) = combo.inner {
                    self.language_query.clear();
                    actions.push(NavAction::SetLanguage(code));
                }
                self.tooltip(
                    ui,
                    Control::Language,
                    &combo.response,
                    t(lang, "change_language"),
                    visuals,
                    now,
                );
            });
        });

        actions
    }

    fn tooltip(
        &mut self,
        ui: &egui::Ui,
        control: Control,
        response: &egui::Response,
        text: &str,
        visuals: Theme,
        now: Duration,
    ) {
        let tip = match control {
            Control::Language => &mut self.language_tip,
            Control::Theme => &mut self.theme_tip,
            Control::Cursor => &mut self.cursor_tip,
        };
        if response.clicked() {
            tip.click();
        }
        tip.update(response.contains_pointer() || response.has_focus(), now);

        if let Some(wait) = tip.remaining(now) {
            ui.ctx().request_repaint_after(wait);
        }
        if !tip.is_shown() {
            return;
        }

        let anchor = response.rect.center_bottom() + egui::vec2(0.0, 6.0);
        Area::new(Id::new(("nav_tooltip", control as u8)))
            .order(Order::Tooltip)
            .fixed_pos(anchor)
            .pivot(egui::Align2::CENTER_TOP)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                Frame::popup(ui.style())
                    .fill(theme::resolve(ThemeToken::TooltipBackground, visuals))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(text)
                                .size(theme::FONT_CAPTION)
                                .color(theme::resolve(ThemeToken::TooltipText, visuals)),
                        );
                    });
            });
    }
}

/// Icon for the current mode and the tooltip naming what a click does.
fn theme_button(mode: ThemeMode) -> (&'static str, &'static str) {
    match mode {
        ThemeMode::Dark => ("🌙", "theme_to_light"),
        ThemeMode::Light => ("☀", "theme_to_dark"),
        ThemeMode::Auto => ("◐", "theme_auto"),
    }
}
