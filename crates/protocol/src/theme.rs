use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Experience entries
    QuestMain,
    QuestSide,
    QuestOther,
    QuestOngoing,
    Connector,

    // Timeline
    Axis,
    AxisMarker,

    SelectionHighlight,
    HoverHighlight,

    // Navigation shell
    NavBackground,
    NavText,
    NavActive,
    TooltipBackground,
    TooltipText,

    EmptyState,
    Splash,
}

impl ThemeToken {
    /// Fill token for an entry category tag.
    pub fn for_category(category: Option<&str>) -> Self {
        match category {
            Some("main") => Self::QuestMain,
            Some("side") => Self::QuestSide,
            _ => Self::QuestOther,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tokens() {
        assert_eq!(ThemeToken::for_category(Some("main")), ThemeToken::QuestMain);
        assert_eq!(ThemeToken::for_category(Some("side")), ThemeToken::QuestSide);
        assert_eq!(ThemeToken::for_category(Some("backend")), ThemeToken::QuestOther);
        assert_eq!(ThemeToken::for_category(None), ThemeToken::QuestOther);
    }
}
