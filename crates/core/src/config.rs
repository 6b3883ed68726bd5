use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fuzzy::FuzzyConfig;
use crate::layout::{TimelineConfig, TreeConfig};
use crate::splash::SplashConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("default language {0:?} is not in the language list")]
    UnknownDefaultLanguage(String),
}

/// Site-wide settings. Every field has a default, so `{}` is a valid
/// config and a missing file simply means `SiteConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Name shown in the navigation bar and, fuzzed, on the home page.
    pub display_name: String,
    pub default_language: String,
    pub languages: Vec<String>,
    /// Where the experience document is fetched from.
    pub experience_url: String,
    pub tooltip_delay_ms: u64,
    /// Full page fade (exit plus enter).
    pub transition_ms: u64,
    pub tree: TreeConfig,
    pub timeline: TimelineConfig,
    pub fuzzy: FuzzyConfig,
    pub splash: SplashConfig,
    /// Open the experience page on the document's first track or category
    /// rather than on all entries.
    pub open_first_category: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            display_name: "questlog".into(),
            default_language: "en".into(),
            languages: vec!["en".into(), "it".into(), "es".into()],
            experience_url: "/assets/experience.json".into(),
            tooltip_delay_ms: 500,
            transition_ms: 300,
            tree: TreeConfig::default(),
            timeline: TimelineConfig::default(),
            fuzzy: FuzzyConfig::default(),
            splash: SplashConfig::default(),
            open_first_category: false,
        }
    }
}

impl SiteConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        if !config.supports_language(&config.default_language) {
            return Err(ConfigError::UnknownDefaultLanguage(
                config.default_language,
            ));
        }
        Ok(config)
    }

    pub fn supports_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let c = SiteConfig::from_json(b"{}").unwrap();
        assert_eq!(c, SiteConfig::default());
        assert_eq!(c.tooltip_delay_ms, 500);
        assert_eq!(c.transition_ms, 300);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let c = SiteConfig::from_json(
            br#"{ "tooltip_delay_ms": 250, "timeline": { "px_per_day": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(c.tooltip_delay_ms, 250);
        assert_eq!(c.timeline.px_per_day, 0.5);
        assert_eq!(c.timeline.min_bar_width, TimelineConfig::default().min_bar_width);
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(SiteConfig::from_json(b"[1,2"), Err(ConfigError::Json(_))));
        assert!(matches!(
            SiteConfig::from_json(br#"{ "default_language": "fr" }"#),
            Err(ConfigError::UnknownDefaultLanguage(_))
        ));
    }
}
