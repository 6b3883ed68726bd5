//! User preferences: theme mode, language and the cursor effect.
//!
//! [`PreferenceStore`] is an explicit context object. Front ends create one
//! at startup from a [`KeyValueStore`], a [`ColorSchemeSource`] and a
//! [`GraphicsProbe`], pass it to the components that need it and subscribe
//! to [`PreferenceChange`] notifications. Storage and probe failures are
//! never surfaced; they degrade to defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SiteConfig;

pub const THEME_MODE_KEY: &str = "questlog.themeMode";
pub const LANGUAGE_KEY: &str = "questlog.language";
pub const CURSOR_EFFECT_KEY: &str = "questlog.cursorEffect";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// light → dark → auto → light
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Auto,
            Self::Auto => Self::Light,
        }
    }

    /// Effective theme given the platform's preference. Auto follows the
    /// platform and falls back to light when it is unknown.
    pub fn resolve(self, system: Option<Theme>) -> Theme {
        match self {
            Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
            Self::Auto => system.unwrap_or(Theme::Light),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Write(String),
    #[error("storage read failed: {0}")]
    Read(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("platform does not report a color scheme")]
    Unsupported,
    #[error("color scheme query failed: {0}")]
    Failed(String),
}

/// String key/value persistence (browser `localStorage`, a JSON file, a map).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The platform's preferred color scheme, if it reports one.
pub trait ColorSchemeSource {
    fn preferred_scheme(&self) -> Result<Option<Theme>, ProbeError>;
}

/// Whether an accelerated drawing context is available for the cursor
/// effect.
pub trait GraphicsProbe {
    fn accelerated(&self) -> bool;
}

impl GraphicsProbe for bool {
    fn accelerated(&self) -> bool {
        *self
    }
}

/// Fixed answer, for headless front ends and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedScheme(pub Option<Theme>);

impl ColorSchemeSource for FixedScheme {
    fn preferred_scheme(&self) -> Result<Option<Theme>, ProbeError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stored preference values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme_mode: ThemeMode,
    pub language: String,
    /// What the user asked for; the effective flag also needs capability.
    pub cursor_effect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    ThemeMode(ThemeMode),
    EffectiveTheme(Theme),
    Language(String),
    CursorEffect(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PreferenceChange)>;

pub struct PreferenceStore {
    storage: Box<dyn KeyValueStore>,
    scheme: Box<dyn ColorSchemeSource>,
    prefs: Preferences,
    /// Last platform reading. Only refreshed while the mode is auto.
    system: Option<Theme>,
    effective: Theme,
    cursor_capable: bool,
    languages: Vec<String>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("prefs", &self.prefs)
            .field("effective", &self.effective)
            .field("cursor_capable", &self.cursor_capable)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl PreferenceStore {
    /// Read stored preferences, probing graphics once.
    pub fn load(
        storage: Box<dyn KeyValueStore>,
        scheme: Box<dyn ColorSchemeSource>,
        graphics: &dyn GraphicsProbe,
        config: &SiteConfig,
    ) -> Self {
        let theme_mode = read(&*storage, THEME_MODE_KEY)
            .and_then(|v| ThemeMode::parse(&v))
            .unwrap_or_default();
        let language = read(&*storage, LANGUAGE_KEY)
            .filter(|code| config.supports_language(code))
            .unwrap_or_else(|| config.default_language.clone());
        let cursor_effect = read(&*storage, CURSOR_EFFECT_KEY)
            .map(|v| v != "false")
            .unwrap_or(true);
        let cursor_capable = graphics.accelerated();
        if !cursor_capable {
            tracing::warn!("no accelerated graphics, cursor effect disabled");
        }

        let mut store = Self {
            storage,
            scheme,
            prefs: Preferences {
                theme_mode,
                language,
                cursor_effect,
            },
            system: None,
            effective: Theme::Light,
            cursor_capable,
            languages: config.languages.clone(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        if theme_mode == ThemeMode::Auto {
            store.system = store.query_scheme();
        }
        store.effective = theme_mode.resolve(store.system);
        tracing::info!(
            mode = %store.prefs.theme_mode,
            theme = store.effective.as_str(),
            language = %store.prefs.language,
            "preferences loaded"
        );
        store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.prefs.theme_mode
    }

    pub fn effective_theme(&self) -> Theme {
        self.effective
    }

    pub fn language(&self) -> &str {
        &self.prefs.language
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Whether the cursor effect should run.
    pub fn cursor_effect(&self) -> bool {
        self.prefs.cursor_effect && self.cursor_capable
    }

    pub fn cursor_toggle_enabled(&self) -> bool {
        self.cursor_capable
    }

    /// The platform scheme is followed only in auto mode.
    pub fn is_tracking_system(&self) -> bool {
        self.prefs.theme_mode == ThemeMode::Auto
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        if mode == self.prefs.theme_mode {
            return;
        }
        self.prefs.theme_mode = mode;
        self.persist(THEME_MODE_KEY, mode.as_str());
        self.notify(&PreferenceChange::ThemeMode(mode));
        self.system = if mode == ThemeMode::Auto {
            self.query_scheme()
        } else {
            None
        };
        self.refresh_effective();
    }

    pub fn cycle_theme_mode(&mut self) -> ThemeMode {
        let next = self.prefs.theme_mode.next();
        self.set_theme_mode(next);
        next
    }

    /// Returns `false` for codes the site does not offer.
    pub fn set_language(&mut self, code: &str) -> bool {
        if !self.languages.iter().any(|l| l == code) {
            tracing::warn!(code, "unsupported language ignored");
            return false;
        }
        if code != self.prefs.language {
            self.prefs.language = code.to_string();
            self.persist(LANGUAGE_KEY, code);
            self.notify(&PreferenceChange::Language(code.to_string()));
        }
        true
    }

    /// No-op returning `false` when the capability is missing.
    pub fn set_cursor_effect(&mut self, on: bool) -> bool {
        if !self.cursor_capable {
            return false;
        }
        if on != self.prefs.cursor_effect {
            self.prefs.cursor_effect = on;
            self.persist(CURSOR_EFFECT_KEY, if on { "true" } else { "false" });
            self.notify(&PreferenceChange::CursorEffect(on));
        }
        true
    }

    pub fn toggle_cursor_effect(&mut self) -> bool {
        let next = !self.prefs.cursor_effect;
        self.set_cursor_effect(next)
    }

    /// Re-read the platform scheme while in auto mode. Returns `true` when
    /// the effective theme changed.
    pub fn poll_system_scheme(&mut self) -> bool {
        if !self.is_tracking_system() {
            return false;
        }
        let reading = self.query_scheme();
        if reading == self.system {
            return false;
        }
        self.system = reading;
        self.refresh_effective()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PreferenceChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn refresh_effective(&mut self) -> bool {
        let next = self.prefs.theme_mode.resolve(self.system);
        if next == self.effective {
            return false;
        }
        self.effective = next;
        tracing::debug!(theme = next.as_str(), "effective theme changed");
        self.notify(&PreferenceChange::EffectiveTheme(next));
        true
    }

    fn query_scheme(&self) -> Option<Theme> {
        match self.scheme.preferred_scheme() {
            Ok(theme) => theme,
            Err(e) => {
                tracing::debug!(error = %e, "color scheme unavailable");
                None
            }
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "preference not saved, keeping it for this session");
        }
    }

    fn notify(&mut self, change: &PreferenceChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

fn read(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "preference storage unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    /// Scheme source whose answer can be changed from the test and which
    /// counts how often it was asked.
    #[derive(Clone, Default)]
    struct SharedScheme {
        answer: Rc<Cell<Option<Theme>>>,
        queries: Rc<Cell<u32>>,
    }

    impl ColorSchemeSource for SharedScheme {
        fn preferred_scheme(&self) -> Result<Option<Theme>, ProbeError> {
            self.queries.set(self.queries.get() + 1);
            Ok(self.answer.get())
        }
    }

    struct BrokenScheme;

    impl ColorSchemeSource for BrokenScheme {
        fn preferred_scheme(&self) -> Result<Option<Theme>, ProbeError> {
            Err(ProbeError::Failed("boom".into()))
        }
    }

    /// Store the test keeps a handle to after handing it over.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn store(storage: MemoryStore, scheme: Option<Theme>, gpu: bool) -> PreferenceStore {
        PreferenceStore::load(
            Box::new(storage),
            Box::new(FixedScheme(scheme)),
            &gpu,
            &SiteConfig::default(),
        )
    }

    #[test]
    fn auto_follows_system_dark() {
        let p = store(MemoryStore::new(), Some(Theme::Dark), true);
        assert_eq!(p.theme_mode(), ThemeMode::Auto);
        assert_eq!(p.effective_theme(), Theme::Dark);
    }

    #[test]
    fn explicit_light_ignores_system() {
        let p = store(
            MemoryStore::new().with(THEME_MODE_KEY, "light"),
            Some(Theme::Dark),
            true,
        );
        assert_eq!(p.effective_theme(), Theme::Light);
    }

    #[test]
    fn unknown_or_failing_scheme_resolves_light() {
        assert_eq!(store(MemoryStore::new(), None, true).effective_theme(), Theme::Light);
        let p = PreferenceStore::load(
            Box::new(MemoryStore::new()),
            Box::new(BrokenScheme),
            &true,
            &SiteConfig::default(),
        );
        assert_eq!(p.effective_theme(), Theme::Light);
    }

    #[test]
    fn cycling_three_times_returns_to_start() {
        let mut p = store(
            MemoryStore::new().with(THEME_MODE_KEY, "light"),
            None,
            true,
        );
        assert_eq!(p.cycle_theme_mode(), ThemeMode::Dark);
        assert_eq!(p.cycle_theme_mode(), ThemeMode::Auto);
        assert_eq!(p.cycle_theme_mode(), ThemeMode::Light);
    }

    #[test]
    fn unavailable_storage_uses_defaults_and_keeps_session_values() {
        let mut p = PreferenceStore::load(
            Box::new(BrokenStore),
            Box::new(FixedScheme(None)),
            &true,
            &SiteConfig::default(),
        );
        assert_eq!(p.theme_mode(), ThemeMode::Auto);
        assert_eq!(p.language(), "en");
        assert!(p.cursor_effect());
        p.set_theme_mode(ThemeMode::Dark);
        assert_eq!(p.effective_theme(), Theme::Dark);
    }

    #[test]
    fn unsupported_stored_language_falls_back() {
        let p = store(MemoryStore::new().with(LANGUAGE_KEY, "fr"), None, true);
        assert_eq!(p.language(), "en");
        let p = store(MemoryStore::new().with(LANGUAGE_KEY, "it"), None, true);
        assert_eq!(p.language(), "it");
    }

    #[test]
    fn set_language_rejects_unknown_codes() {
        let mut p = store(MemoryStore::new(), None, true);
        assert!(!p.set_language("xx"));
        assert!(p.set_language("es"));
        assert_eq!(p.language(), "es");
    }

    #[test]
    fn cursor_effect_requires_capability() {
        let mut p = store(MemoryStore::new().with(CURSOR_EFFECT_KEY, "true"), None, false);
        assert!(!p.cursor_effect());
        assert!(!p.cursor_toggle_enabled());
        assert!(!p.set_cursor_effect(true));
        assert!(!p.cursor_effect());

        let mut p = store(MemoryStore::new(), None, true);
        assert!(p.cursor_effect());
        assert!(p.toggle_cursor_effect());
        assert!(!p.cursor_effect());
    }

    #[test]
    fn system_tracking_only_while_auto() {
        let scheme = SharedScheme::default();
        let mut p = PreferenceStore::load(
            Box::new(MemoryStore::new().with(THEME_MODE_KEY, "dark")),
            Box::new(scheme.clone()),
            &true,
            &SiteConfig::default(),
        );
        assert_eq!(scheme.queries.get(), 0);
        assert!(!p.poll_system_scheme());
        assert_eq!(scheme.queries.get(), 0);

        scheme.answer.set(Some(Theme::Dark));
        p.set_theme_mode(ThemeMode::Auto);
        assert_eq!(scheme.queries.get(), 1);
        assert_eq!(p.effective_theme(), Theme::Dark);

        scheme.answer.set(Some(Theme::Light));
        assert!(p.poll_system_scheme());
        assert_eq!(p.effective_theme(), Theme::Light);
        assert!(!p.poll_system_scheme());

        p.set_theme_mode(ThemeMode::Light);
        let before = scheme.queries.get();
        p.poll_system_scheme();
        assert_eq!(scheme.queries.get(), before);
    }

    #[test]
    fn listeners_see_only_real_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut p = store(MemoryStore::new().with(THEME_MODE_KEY, "light"), None, true);
        let sink = Rc::clone(&seen);
        let id = p.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        p.set_theme_mode(ThemeMode::Light);
        p.set_theme_mode(ThemeMode::Dark);
        p.set_language("en");
        p.set_language("it");
        assert_eq!(
            *seen.borrow(),
            vec![
                PreferenceChange::ThemeMode(ThemeMode::Dark),
                PreferenceChange::EffectiveTheme(Theme::Dark),
                PreferenceChange::Language("it".into()),
            ]
        );

        assert!(p.unsubscribe(id));
        assert!(!p.unsubscribe(id));
        p.set_theme_mode(ThemeMode::Light);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn writes_reach_storage() {
        let backing = SharedStore::default();
        let mut p = PreferenceStore::load(
            Box::new(backing.clone()),
            Box::new(FixedScheme(None)),
            &true,
            &SiteConfig::default(),
        );
        let stored = |key: &str| backing.0.borrow().get(key).unwrap();

        p.set_theme_mode(ThemeMode::Dark);
        assert_eq!(stored(THEME_MODE_KEY).as_deref(), Some("dark"));
        p.cycle_theme_mode();
        assert_eq!(stored(THEME_MODE_KEY).as_deref(), Some("auto"));
        p.set_theme_mode(ThemeMode::Light);
        assert_eq!(stored(THEME_MODE_KEY).as_deref(), Some("light"));

        assert!(p.set_language("it"));
        assert_eq!(stored(LANGUAGE_KEY).as_deref(), Some("it"));

        p.set_cursor_effect(false);
        assert_eq!(stored(CURSOR_EFFECT_KEY).as_deref(), Some("false"));
        p.toggle_cursor_effect();
        assert_eq!(stored(CURSOR_EFFECT_KEY).as_deref(), Some("true"));
    }
}
