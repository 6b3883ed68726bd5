use std::sync::{Arc, Mutex};

use questlog_core::model::LoadTicket;

/// Experience document shipped with the binary.
pub const BUNDLED_EXPERIENCE: &[u8] = include_bytes!("../../../assets/experience.json");

type Delivery = (LoadTicket, Result<Vec<u8>, String>);

/// Where the experience document comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Fetched over HTTP (wasm).
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Url(String),
    /// Read from disk. An unreadable file is a failed load.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    File(std::path::PathBuf),
    Bundled,
}

/// One-slot hand-off of fetched bytes into the frame loop. Each delivery
/// carries the ticket it was started with so the session can drop stale
/// results.
#[derive(Clone, Default)]
pub struct Loader {
    slot: Arc<Mutex<Option<Delivery>>>,
}

impl Loader {
    pub fn start(&self, ctx: &egui::Context, ticket: LoadTicket, source: &Source) {
        match source {
            Source::Bundled => self.deliver(ticket, Ok(BUNDLED_EXPERIENCE.to_vec())),
            #[cfg(not(target_arch = "wasm32"))]
            Source::File(path) => {
                let result = std::fs::read(path).map_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "could not read experience");
                    format!("{}: {e}", path.display())
                });
                self.deliver(ticket, result);
            }
            #[cfg(target_arch = "wasm32")]
            Source::File(path) => {
                self.deliver(ticket, Err(format!("{}: no file access in the browser", path.display())));
            }
            #[cfg(target_arch = "wasm32")]
            Source::Url(url) => {
                let slot = self.slot.clone();
                let ctx = ctx.clone();
                let url = url.clone();
                tracing::info!(%url, "fetching experience");
                wasm_bindgen_futures::spawn_local(async move {
                    let result = fetch_bytes(&url).await;
                    if let Err(e) = &result {
                        tracing::warn!(%url, error = %e, "experience fetch failed");
                    }
                    let mut lock = slot.lock().unwrap_or_else(|e| e.into_inner());
                    *lock = Some((ticket, result));
                    drop(lock);
                    ctx.request_repaint();
                });
            }
            #[cfg(not(target_arch = "wasm32"))]
            Source::Url(url) => {
                tracing::debug!(%url, "no HTTP client natively, using bundled experience");
                self.deliver(ticket, Ok(BUNDLED_EXPERIENCE.to_vec()));
            }
        }
        ctx.request_repaint();
    }

    pub fn take(&self) -> Option<Delivery> {
        let mut lock = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        lock.take()
    }

    fn deliver(&self, ticket: LoadTicket, result: Result<Vec<u8>, String>) {
        let mut lock = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *lock = Some((ticket, result));
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or("no window")?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("{e:?}"))?;
    let resp: web_sys::Response = resp_value.dyn_into().map_err(|_| "not a Response")?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_core::model::{EmptyReason, ExperienceSession, LoadState};

    #[test]
    fn bundled_document_parses() {
        let exp = questlog_core::parsers::parse_auto(BUNDLED_EXPERIENCE).unwrap();
        assert!(!exp.is_empty());
    }

    #[test]
    fn delivery_keeps_its_ticket() {
        let ctx = egui::Context::default();
        let loader = Loader::default();
        let mut session = ExperienceSession::default();
        let first = session.begin_load();
        let second = session.begin_load();
        loader.start(&ctx, first, &Source::Bundled);

        let (ticket, bytes) = loader.take().unwrap();
        assert_eq!(ticket, first);
        assert!(!session.finish_load(ticket, bytes));
        assert!(loader.take().is_none());

        loader.start(&ctx, second, &Source::Bundled);
        let (ticket, bytes) = loader.take().unwrap();
        assert!(session.finish_load(ticket, bytes));
    }

    #[test]
    fn unreadable_file_is_a_failed_load() {
        let ctx = egui::Context::default();
        let loader = Loader::default();
        let mut session = ExperienceSession::default();
        let ticket = session.begin_load();
        let missing = std::env::temp_dir().join("questlog-no-such-dir/experience.json");
        loader.start(&ctx, ticket, &Source::File(missing));

        let (ticket, result) = loader.take().unwrap();
        assert!(result.is_err());
        assert!(session.finish_load(ticket, result));
        assert!(session.source().is_empty());
        assert!(matches!(
            session.state(),
            LoadState::Empty(EmptyReason::LoadFailed(_))
        ));
    }

    #[test]
    fn poisoned_slot_still_delivers() {
        let loader = Loader::default();
        let slot = loader.slot.clone();
        let _ = std::thread::spawn(move || {
            let _guard = slot.lock().unwrap();
            panic!("poison the slot");
        })
        .join();
        assert!(loader.slot.is_poisoned());

        let mut session = ExperienceSession::default();
        let ticket = session.begin_load();
        loader.deliver(ticket, Ok(BUNDLED_EXPERIENCE.to_vec()));
        let (delivered, _) = loader.take().unwrap();
        assert_eq!(delivered, ticket);
    }
}
