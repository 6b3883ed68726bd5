use questlog_core::prefs::Theme;
use questlog_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

pub fn resolve(token: ThemeToken, theme: Theme) -> egui::Color32 {
    match theme {
        Theme::Dark => resolve_dark(token),
        Theme::Light => resolve_light(token),
    }
    .to_color32()
}

/// Same as [`resolve`], scaled by a page-transition opacity.
pub fn resolve_faded(token: ThemeToken, theme: Theme, opacity: f32) -> egui::Color32 {
    let c = resolve(token, theme);
    if opacity >= 1.0 {
        c
    } else {
        c.gamma_multiply(opacity.clamp(0.0, 1.0))
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        Surface => ResolvedColor::rgb(0x18, 0x18, 0x25),    // Mantle
        Border => ResolvedColor::rgb(0x31, 0x32, 0x44),     // Surface0

        TextPrimary => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text
        TextSecondary => ResolvedColor::rgb(0xba, 0xc2, 0xde), // Subtext1
        TextMuted => ResolvedColor::rgb(0xa6, 0xad, 0xc8),   // Subtext0

        QuestMain => ResolvedColor::rgb(0x89, 0xb4, 0xfa),    // Blue
        QuestSide => ResolvedColor::rgb(0x94, 0xe2, 0xd5),    // Teal
        QuestOther => ResolvedColor::rgb(0xcb, 0xa6, 0xf7),   // Mauve
        QuestOngoing => ResolvedColor::rgb(0xfa, 0xb3, 0x87), // Peach
        Connector => ResolvedColor::rgba(0x6c, 0x70, 0x86, 160), // Overlay0

        Axis => ResolvedColor::rgb(0x58, 0x5b, 0x70),       // Surface2
        AxisMarker => ResolvedColor::rgb(0xb4, 0xbe, 0xfe), // Lavender

        SelectionHighlight => ResolvedColor::rgb(0xf9, 0xe2, 0xaf), // Yellow
        HoverHighlight => ResolvedColor::rgba(0xcd, 0xd6, 0xf4, 25),

        NavBackground => ResolvedColor::rgb(0x18, 0x18, 0x25),
        NavText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
        NavActive => ResolvedColor::rgb(0x89, 0xb4, 0xfa),
        TooltipBackground => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
        TooltipText => ResolvedColor::rgb(0x1e, 0x1e, 0x2e),

        EmptyState => ResolvedColor::rgb(0x6c, 0x70, 0x86),
        Splash => ResolvedColor::rgb(0xf5, 0xc2, 0xe7), // Pink
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(255, 255, 255),
        Surface => ResolvedColor::rgb(245, 245, 248),
        Border => ResolvedColor::rgb(210, 210, 220),

        TextPrimary => ResolvedColor::rgb(20, 20, 30),
        TextSecondary => ResolvedColor::rgb(80, 80, 100),
        TextMuted => ResolvedColor::rgb(100, 100, 110),

        QuestMain => ResolvedColor::rgb(50, 110, 220),
        QuestSide => ResolvedColor::rgb(20, 150, 130),
        QuestOther => ResolvedColor::rgb(120, 140, 170),
        QuestOngoing => ResolvedColor::rgb(230, 150, 20),
        Connector => ResolvedColor::rgba(60, 60, 80, 120),

        Axis => ResolvedColor::rgb(190, 190, 200),
        AxisMarker => ResolvedColor::rgb(40, 80, 180),

        SelectionHighlight => ResolvedColor::rgb(211, 47, 47),
        HoverHighlight => ResolvedColor::rgba(0, 0, 0, 15),

        NavBackground => ResolvedColor::rgb(248, 248, 250),
        NavText => ResolvedColor::rgb(40, 40, 50),
        NavActive => ResolvedColor::rgb(50, 110, 220),
        TooltipBackground => ResolvedColor::rgb(40, 40, 50),
        TooltipText => ResolvedColor::rgb(250, 250, 252),

        EmptyState => ResolvedColor::rgb(150, 150, 160),
        Splash => ResolvedColor::rgb(180, 80, 200),
    }
}

// ── Typography scale ───────────────────────────────────────────────────────

pub const FONT_DISPLAY: f32 = 64.0;
pub const FONT_TITLE: f32 = 22.0;
pub const FONT_EMPHASIS: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_CAPTION: f32 = 12.0;

// ── egui visual presets ────────────────────────────────────────────────────

pub fn visuals(theme: Theme) -> egui::Visuals {
    match theme {
        Theme::Dark => dark_visuals(),
        Theme::Light => light_visuals(),
    }
}

/// Catppuccin Mocha dark visuals for egui widgets.
fn dark_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.panel_fill = egui::Color32::from_rgb(0x11, 0x11, 0x1b);
    v.window_fill = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.extreme_bg_color = egui::Color32::from_rgb(0x11, 0x11, 0x1b);
    v.faint_bg_color = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(0x31, 0x32, 0x44);
    v.widgets.noninteractive.fg_stroke =
        egui::Stroke::new(1.0, egui::Color32::from_rgb(0xba, 0xc2, 0xde));
    v.widgets.noninteractive.bg_stroke =
        egui::Stroke::new(1.0, egui::Color32::from_rgb(0x45, 0x47, 0x5a));
    v.widgets.inactive.bg_fill = egui::Color32::from_rgb(0x31, 0x32, 0x44);
    v.widgets.inactive.fg_stroke =
        egui::Stroke::new(1.0, egui::Color32::from_rgb(0xba, 0xc2, 0xde));
    v.widgets.hovered.bg_fill = egui::Color32::from_rgb(0x45, 0x47, 0x5a);
    v.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0xcd, 0xd6, 0xf4));
    v.widgets.active.bg_fill = egui::Color32::from_rgb(0x89, 0xb4, 0xfa);
    v.widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x1e, 0x1e, 0x2e));
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(0x89, 0xb4, 0xfa, 60);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x89, 0xb4, 0xfa));
    rounded(&mut v);
    v.hyperlink_color = egui::Color32::from_rgb(0x89, 0xb4, 0xfa);
    v.warn_fg_color = egui::Color32::from_rgb(0xf9, 0xe2, 0xaf);
    v.error_fg_color = egui::Color32::from_rgb(0xf3, 0x8b, 0xa8);
    v
}

fn light_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::light();
    v.panel_fill = egui::Color32::from_rgb(255, 255, 255);
    v.window_fill = egui::Color32::from_rgb(255, 255, 255);
    v.extreme_bg_color = egui::Color32::from_rgb(255, 255, 255);
    v.faint_bg_color = egui::Color32::from_rgb(245, 245, 248);
    v.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(240, 240, 243);
    v.widgets.noninteractive.fg_stroke =
        egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 60, 70));
    v.widgets.noninteractive.bg_stroke =
        egui::Stroke::new(1.0, egui::Color32::from_rgb(210, 210, 215));
    v.widgets.inactive.bg_fill = egui::Color32::from_rgb(235, 235, 240);
    v.widgets.hovered.bg_fill = egui::Color32::from_rgb(220, 220, 228);
    v.widgets.active.bg_fill = egui::Color32::from_rgb(50, 110, 220);
    v.widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(50, 110, 220, 50);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(50, 110, 220));
    rounded(&mut v);
    v.hyperlink_color = egui::Color32::from_rgb(50, 110, 220);
    v.warn_fg_color = egui::Color32::from_rgb(230, 170, 0);
    v.error_fg_color = egui::Color32::from_rgb(211, 47, 47);
    v
}

fn rounded(v: &mut egui::Visuals) {
    v.window_corner_radius = egui::CornerRadius::same(8);
    v.menu_corner_radius = egui::CornerRadius::same(6);
    v.widgets.noninteractive.corner_radius = egui::CornerRadius::same(5);
    v.widgets.inactive.corner_radius = egui::CornerRadius::same(5);
    v.widgets.hovered.corner_radius = egui::CornerRadius::same(5);
    v.widgets.active.corner_radius = egui::CornerRadius::same(5);
    v.widgets.open.corner_radius = egui::CornerRadius::same(5);
}

/// Apply the site's typography scale to egui styles.
pub fn apply_typography(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::proportional(FONT_TITLE),
    );
    style
        .text_styles
        .insert(egui::TextStyle::Body, egui::FontId::proportional(FONT_BODY));
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::proportional(FONT_BODY),
    );
    style.text_styles.insert(
        egui::TextStyle::Small,
        egui::FontId::proportional(FONT_CAPTION),
    );
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.interact_size.y = 28.0;
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_for_background() {
        assert_ne!(
            resolve(ThemeToken::Background, Theme::Dark),
            resolve(ThemeToken::Background, Theme::Light)
        );
    }

    #[test]
    fn fading_scales_alpha() {
        let full = resolve_faded(ThemeToken::QuestMain, Theme::Light, 1.0);
        let half = resolve_faded(ThemeToken::QuestMain, Theme::Light, 0.5);
        assert_eq!(full.a(), 255);
        assert!(half.a() < full.a());
    }
}
