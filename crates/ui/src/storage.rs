//! Platform adapters behind the preference store's traits.

use std::cell::Cell;
use std::rc::Rc;

use questlog_core::prefs::{ColorSchemeSource, KeyValueStore, MemoryStore, ProbeError, Theme};
#[cfg(target_arch = "wasm32")]
use questlog_core::prefs::StorageError;

/// Best store the platform offers, or an in-memory map when none works.
pub fn platform_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        if BrowserStore::available() {
            return Box::new(BrowserStore);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        match native::JsonFileStore::open_default() {
            Ok(store) => return Box::new(store),
            Err(e) => tracing::warn!(error = %e, "preferences file unavailable"),
        }
    }
    tracing::warn!("falling back to in-memory preferences");
    Box::new(MemoryStore::new())
}

// ── Browser localStorage ──────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn available() -> bool {
        local_storage().is_some()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}

// ── Native JSON file ──────────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;

    use anyhow::Context as _;
    use questlog_core::prefs::{KeyValueStore, StorageError};

    /// Preferences kept as a flat JSON object under the user's config dir.
    #[derive(Debug)]
    pub struct JsonFileStore {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl JsonFileStore {
        pub fn open_default() -> anyhow::Result<Self> {
            let base = dirs::config_dir().context("could not determine config directory")?;
            Self::open(base.join("questlog").join("prefs.json"))
        }

        /// A missing file is an empty store; an unreadable one is an error.
        pub fn open(path: PathBuf) -> anyhow::Result<Self> {
            let values = match fs::read(&path) {
                Ok(bytes) => serde_json::from_slice(&bytes)
                    .with_context(|| format!("parsing {}", path.display()))?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
            };
            Ok(Self { path, values })
        }

        fn flush(&self) -> Result<(), StorageError> {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir).map_err(|e| StorageError::Write(e.to_string()))?;
            }
            let json = serde_json::to_vec_pretty(&self.values)
                .map_err(|e| StorageError::Write(e.to_string()))?;
            fs::write(&self.path, json).map_err(|e| StorageError::Write(e.to_string()))
        }
    }

    impl KeyValueStore for JsonFileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values.insert(key.to_string(), value.to_string());
            self.flush()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn values_survive_reopen() {
            let dir = std::env::temp_dir().join(format!("questlog-prefs-{}", std::process::id()));
            let path = dir.join("prefs.json");
            let _ = fs::remove_file(&path);

            let mut store = JsonFileStore::open(path.clone()).unwrap();
            assert_eq!(store.get("questlog.language").unwrap(), None);
            store.set("questlog.language", "it").unwrap();

            let reopened = JsonFileStore::open(path.clone()).unwrap();
            assert_eq!(
                reopened.get("questlog.language").unwrap().as_deref(),
                Some("it")
            );
            let _ = fs::remove_dir_all(dir);
        }

        #[test]
        fn corrupt_file_is_an_error() {
            let dir = std::env::temp_dir().join(format!("questlog-bad-{}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            let path = dir.join("prefs.json");
            fs::write(&path, b"{ not json").unwrap();
            assert!(JsonFileStore::open(path).is_err());
            let _ = fs::remove_dir_all(dir);
        }
    }
}

// ── Platform color scheme ─────────────────────────────────────────────────

/// Color scheme reported by the windowing backend. The app writes the
/// latest `RawInput::system_theme` reading every frame; the preference
/// store reads it when it polls.
#[derive(Debug, Clone, Default)]
pub struct SystemScheme(Rc<Cell<Option<Theme>>>);

impl SystemScheme {
    pub fn set(&self, reading: Option<egui::Theme>) {
        self.0.set(reading.map(|t| match t {
            egui::Theme::Dark => Theme::Dark,
            egui::Theme::Light => Theme::Light,
        }));
    }
}

impl ColorSchemeSource for SystemScheme {
    fn preferred_scheme(&self) -> Result<Option<Theme>, ProbeError> {
        Ok(self.0.get())
    }
}
