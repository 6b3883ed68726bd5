pub mod about;
pub mod experience;
pub mod home;
pub mod not_found;

use questlog_core::prefs::Theme;
use questlog_protocol::ThemeToken;

use crate::theme;

/// Per-frame inputs every page reads.
#[derive(Debug, Clone, Copy)]
pub struct PageCtx<'a> {
    pub lang: &'a str,
    pub theme: Theme,
    /// Page-transition opacity, 0 to 1.
    pub opacity: f32,
}

impl PageCtx<'_> {
    pub fn t<'k>(&self, key: &'k str) -> &'k str {
        crate::i18n::t(self.lang, key)
    }

    pub fn color(&self, token: ThemeToken) -> egui::Color32 {
        theme::resolve_faded(token, self.theme, self.opacity)
    }

    /// Pages slide up into place while fading in.
    pub fn slide_offset(&self) -> f32 {
        (1.0 - self.opacity) * 30.0
    }
}
