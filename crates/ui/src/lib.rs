mod app;
mod fuzzy_text;
mod i18n;
mod loader;
mod nav;
mod pages;
mod renderer;
mod splash;
mod storage;
mod theme;

pub use app::QuestlogApp;
pub use loader::Source;

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect tracing/panics to console
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let config = questlog_core::SiteConfig::default();
    let source = Source::Url(config.experience_url.clone());
    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            tracing::error!("no document to mount into");
            return;
        };
        let canvas = match document
            .get_element_by_id("questlog_canvas")
            .map(|el| el.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            _ => {
                tracing::error!("no canvas element with id 'questlog_canvas'");
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(QuestlogApp::new(cc, config, source)))),
            )
            .await;
        if let Err(e) = start_result {
            tracing::error!("failed to start eframe: {e:?}");
        }
    });
    Ok(())
}
