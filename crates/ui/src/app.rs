use std::time::Duration;

use eframe::egui;
use questlog_core::prefs::{ListenerId, PreferenceChange, PreferenceStore, Theme};
use questlog_core::routes::{Route, Router};
use questlog_core::SiteConfig;
use questlog_protocol::ThemeToken;

use crate::loader::Source;
use crate::nav::{NavAction, NavBar};
use crate::pages::{about, experience::ExperiencePage, home::HomePage, not_found::NotFoundPage, PageCtx};
use crate::splash::SplashOverlay;
use crate::storage::{self, SystemScheme};
use crate::theme;

/// Main application state.
pub struct QuestlogApp {
    config: SiteConfig,
    prefs: PreferenceStore,
    /// Written every frame from the backend's system theme reading.
    scheme: SystemScheme,
    listener: Option<ListenerId>,
    router: Router,
    nav: NavBar,
    home: HomePage,
    experience: ExperiencePage,
    not_found: NotFoundPage,
    splash: SplashOverlay,
}

impl QuestlogApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: SiteConfig, source: Source) -> Self {
        let ctx = &cc.egui_ctx;
        theme::apply_typography(ctx);
        ctx.set_visuals_of(egui::Theme::Dark, theme::visuals(Theme::Dark));
        ctx.set_visuals_of(egui::Theme::Light, theme::visuals(Theme::Light));

        let scheme = SystemScheme::default();
        scheme.set(ctx.input(|i| i.raw.system_theme));
        let accelerated = cc.gl.is_some();
        let mut prefs = PreferenceStore::load(
            storage::platform_store(),
            Box::new(scheme.clone()),
            &accelerated,
            &config,
        );
        apply_theme(ctx, prefs.effective_theme());

        let listener_ctx = ctx.clone();
        let listener = prefs.subscribe(move |change| {
            tracing::debug!(?change, "preference changed");
            if let PreferenceChange::EffectiveTheme(t) = change {
                apply_theme(&listener_ctx, *t);
            }
            listener_ctx.request_repaint();
        });

        let router = Router::new(initial_route(), config.transition_ms);

        Self {
            nav: NavBar::new(config.tooltip_delay_ms),
            home: HomePage::new(config.fuzzy),
            experience: ExperiencePage::new(&config, source),
            not_found: NotFoundPage::new(config.fuzzy),
            splash: SplashOverlay::new(config.splash),
            config,
            prefs,
            scheme,
            listener: Some(listener),
            router,
        }
    }

    fn navigate(&mut self, route: Route, now: Duration) {
        if self.router.navigate(route, now) {
            push_location(route);
        }
    }

    fn apply(&mut self, action: NavAction, now: Duration) {
        match action {
            NavAction::Navigate(route) => self.navigate(route, now),
            NavAction::SetLanguage(code) => {
                self.prefs.set_language(&code);
            }
            NavAction::CycleTheme => {
                self.prefs.cycle_theme_mode();
            }
            NavAction::ToggleCursor => {
                self.prefs.toggle_cursor_effect();
            }
        }
    }
}

impl eframe::App for QuestlogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));

        self.scheme.set(ctx.input(|i| i.raw.system_theme));
        self.prefs.poll_system_scheme();

        if let Some(route) = browser_route_change(self.router.current()) {
            self.router.navigate(route, now);
        }
        if self.router.tick(now) {
            ctx.request_repaint();
        }
        let (route, opacity) = self.router.frame(now);
        let visuals = self.prefs.effective_theme();

        let nav_frame = egui::Frame::side_top_panel(&ctx.style())
            .fill(theme::resolve(ThemeToken::NavBackground, visuals))
            .inner_margin(egui::Margin::symmetric(16, 8));
        let actions = egui::TopBottomPanel::top("nav")
            .frame(nav_frame)
            .show(ctx, |ui| {
                self.nav.show(
                    ui,
                    &self.config.display_name,
                    &self.prefs,
                    self.router.current(),
                    now,
                )
            })
            .inner;
        for action in actions {
            self.apply(action, now);
        }

        let mut go_home = false;
        let page_frame = egui::Frame::central_panel(&ctx.style())
            .fill(theme::resolve(ThemeToken::Background, visuals));
        egui::CentralPanel::default().frame(page_frame).show(ctx, |ui| {
            let page = PageCtx {
                lang: self.prefs.language(),
                theme: visuals,
                opacity,
            };
            match route {
                Route::Home => self.home.show(ui, &page, &self.config.display_name),
                Route::About => about::show(ui, &page),
                Route::Experience => self.experience.show(ui, &page),
                Route::NotFound => go_home = self.not_found.show(ui, &page),
            }
        });
        if go_home {
            self.navigate(Route::Home, now);
        }

        if self.prefs.cursor_effect() {
            self.splash.frame(ctx);
        } else {
            self.splash.disable();
        }
    }
}

impl Drop for QuestlogApp {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.prefs.unsubscribe(id);
        }
    }
}

fn apply_theme(ctx: &egui::Context, t: Theme) {
    ctx.set_theme(match t {
        Theme::Dark => egui::Theme::Dark,
        Theme::Light => egui::Theme::Light,
    });
}

// ── Browser location ──────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn location_path() -> Option<String> {
    web_sys::window().and_then(|w| w.location().pathname().ok())
}

#[cfg(target_arch = "wasm32")]
fn initial_route() -> Route {
    location_path().map_or(Route::Home, |p| Route::from_path(&p))
}

#[cfg(not(target_arch = "wasm32"))]
fn initial_route() -> Route {
    Route::Home
}

/// Route the address bar moved to (back/forward), if it differs from the
/// router's.
#[cfg(target_arch = "wasm32")]
fn browser_route_change(current: Route) -> Option<Route> {
    let route = Route::from_path(&location_path()?);
    (route != current).then_some(route)
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_route_change(_current: Route) -> Option<Route> {
    None
}

#[cfg(target_arch = "wasm32")]
fn push_location(route: Route) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route.path())) {
        tracing::warn!(error = ?e, "could not update the address bar");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn push_location(_route: Route) {}
