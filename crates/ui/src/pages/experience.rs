use chrono::NaiveDate;
use egui::{Align2, CornerRadius, RichText, Sense, Vec2};
use questlog_core::layout::ViewKind;
use questlog_core::model::{EmptyReason, Entry, ExperienceSession, LoadState};
use questlog_core::views::{ViewOptions, format_duration, format_period, render_empty_state, render_layout};
use questlog_core::SiteConfig;
use questlog_protocol::{RenderCommand, SharedStr, ThemeToken, Viewport};

use super::PageCtx;
use crate::loader::{Loader, Source};
use crate::renderer;
use crate::theme;

/// Experience page: category chips, view switch and the laid-out canvas,
/// with a detail window for the selected entry.
pub struct ExperiencePage {
    session: ExperienceSession,
    loader: Loader,
    source: Source,
    pan: Vec2,
}

impl ExperiencePage {
    pub fn new(config: &SiteConfig, source: Source) -> Self {
        let mut session = ExperienceSession::new(config.tree, config.timeline);
        session.set_open_first_category(config.open_first_category);
        Self {
            session,
            loader: Loader::default(),
            source,
            pan: Vec2::ZERO,
        }
    }

    /// Start loading from `source`, superseding any load in flight.
    pub fn load(&mut self, ctx: &egui::Context, source: Source) {
        self.source = source;
        let ticket = self.session.begin_load();
        self.loader.start(ctx, ticket, &self.source);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, page: &PageCtx<'_>) {
        if *self.session.state() == LoadState::Idle {
            self.load(ui.ctx(), self.source.clone());
        }
        if let Some((ticket, result)) = self.loader.take() {
            if self.session.finish_load(ticket, result) {
                self.pan = Vec2::ZERO;
            }
        }
        self.handle_dropped_files(ui.ctx());

        ui.add_space(page.slide_offset());
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(page.t("experience_title"))
                    .size(theme::FONT_TITLE * 1.3)
                    .strong()
                    .color(page.color(ThemeToken::TextPrimary)),
            );
        });
        ui.add_space(6.0);
        self.toolbar(ui, page);
        ui.add_space(6.0);
        self.canvas(ui, page);
        self.detail_window(ui.ctx(), page);
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, page: &PageCtx<'_>) {
        ui.horizontal_wrapped(|ui| {
            let active = self.session.category().cloned();
            if ui
                .selectable_label(active.is_none(), page.t("experience_all"))
                .clicked()
            {
                self.switch_category(None);
            }
            for category in self.session.categories() {
                let label = self
                    .session
                    .source()
                    .tracks
                    .iter()
                    .find(|t| t.id == category)
                    .map_or_else(|| category.to_string(), |t| t.display_name().to_string());
                if ui
                    .selectable_label(active.as_ref() == Some(&category), label)
                    .clicked()
                {
                    self.switch_category(Some(category.as_str()));
                }
            }

            ui.separator();
            for (kind, key) in [(ViewKind::Timeline, "view_timeline"), (ViewKind::Tree, "view_tree")] {
                if ui
                    .selectable_label(self.session.view() == kind, page.t(key))
                    .clicked()
                    && self.session.view() != kind
                {
                    self.session.set_view(kind);
                    self.pan = Vec2::ZERO;
                }
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.separator();
                if ui.button(page.t("experience_open")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Experience", &["json"])
                        .pick_file()
                    {
                        self.load(ui.ctx(), Source::File(path));
                    }
                }
            }
        });
    }

    fn switch_category(&mut self, category: Option<&str>) {
        self.session.set_category(category);
        self.pan = Vec2::ZERO;
    }

    fn canvas(&mut self, ui: &mut egui::Ui, page: &PageCtx<'_>) {
        let available = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(available, Sense::click_and_drag());

        if response.dragged() {
            self.pan -= response.drag_delta();
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta);
            self.pan -= scroll;
        }
        self.pan.y = self.pan.y.max(-available.height() / 2.0);

        let viewport = Viewport {
            x: f64::from(self.pan.x),
            y: f64::from(self.pan.y),
            width: f64::from(available.width()),
            height: f64::from(available.height()),
            dpr: f64::from(ui.ctx().pixels_per_point()),
        };
        let commands = self.commands(&viewport, page, today());

        let mut painter = ui.painter_at(available);
        painter.rect_filled(available, CornerRadius::same(8), page.color(ThemeToken::Surface));
        let result = renderer::render_commands(
            &mut painter,
            &commands,
            available.min,
            page.theme,
            page.opacity,
        );

        if let Some(pos) = response.hover_pos() {
            if let Some(hit) = result.hit(pos) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                if let Some(label) = &hit.label {
                    painter.text(
                        pos + Vec2::new(12.0, -12.0),
                        Align2::LEFT_BOTTOM,
                        label.as_str(),
                        egui::FontId::proportional(theme::FONT_CAPTION),
                        page.color(ThemeToken::TextSecondary),
                    );
                }
            }
        }

        if response.clicked() {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pos| result.hit(pos))
                .map(|h| h.entry_id.clone());
            match hit {
                Some(id) => {
                    self.session.select(&id);
                }
                None => self.session.close_selection(),
            }
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.close_selection();
        }
    }

    fn commands(&mut self, viewport: &Viewport, page: &PageCtx<'_>, now: NaiveDate) -> Vec<RenderCommand> {
        let present = page.t("experience_present");
        if let Some(frame) = self.session.frame(now) {
            let options = ViewOptions {
                selected: frame.selected.map(SharedStr::as_str),
                present_label: present,
            };
            return render_layout(frame.experience, frame.layout, viewport, &options);
        }
        let key = match self.session.state() {
            LoadState::Idle | LoadState::Loading => "experience_loading",
            LoadState::Empty(EmptyReason::LoadFailed(_)) => "experience_failed",
            LoadState::Ready | LoadState::Empty(_) => "experience_empty",
        };
        render_empty_state(viewport, page.t(key))
    }

    fn detail_window(&mut self, ctx: &egui::Context, page: &PageCtx<'_>) {
        let Some(entry) = self.session.selected_entry().cloned() else {
            return;
        };
        let mut open = true;
        let mut close_clicked = false;
        egui::Window::new(entry.title.as_str())
            .id(egui::Id::new("experience_detail"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::RIGHT_TOP, Vec2::new(-24.0, 96.0))
            .default_width(320.0)
            .show(ctx, |ui| {
                entry_details(ui, &entry, page);
                ui.add_space(8.0);
                close_clicked = ui.button(page.t("experience_close")).clicked();
            });
        if !open || close_clicked {
            self.session.close_selection();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };
        if let Some(bytes) = file.bytes {
            let ticket = self.session.begin_load();
            self.session.finish_load::<String>(ticket, Ok(bytes.to_vec()));
            self.pan = Vec2::ZERO;
        } else if let Some(path) = file.path {
            self.load(ctx, Source::File(path));
        }
    }
}

fn entry_details(ui: &mut egui::Ui, entry: &Entry, page: &PageCtx<'_>) {
    let now = today();
    ui.label(
        RichText::new(format!(
            "{}  ·  {}",
            format_period(entry.start, entry.end, page.t("experience_present")),
            format_duration(entry.elapsed_days(now)),
        ))
        .size(theme::FONT_CAPTION)
        .color(page.color(ThemeToken::TextMuted)),
    );
    if !entry.description.is_empty() {
        ui.add_space(6.0);
        ui.label(entry.description.as_str());
    }
    if !entry.skills.is_empty() {
        ui.add_space(6.0);
        ui.label(RichText::new(page.t("experience_skills")).strong());
        ui.horizontal_wrapped(|ui| {
            for skill in &entry.skills {
                ui.label(
                    RichText::new(skill)
                        .size(theme::FONT_CAPTION)
                        .background_color(page.color(ThemeToken::Border)),
                );
            }
        });
    }
    if let Some(image) = &entry.image {
        ui.hyperlink_to("🖼", image);
    }
    if let Some(url) = &entry.url {
        ui.hyperlink_to(page.t("experience_visit"), url);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
