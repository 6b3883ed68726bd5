#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::path::PathBuf;

    use anyhow::Context as _;
    use questlog_core::SiteConfig;
    use questlog_ui::{QuestlogApp, Source};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // questlog-ui [experience.json] [--config site.json]
    let mut experience = None;
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(args.next().context("--config needs a path")?),
            _ => experience = Some(PathBuf::from(arg)),
        }
    }

    let config = match config_path {
        Some(path) => {
            let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            SiteConfig::from_json(&data).with_context(|| format!("parsing {path}"))?
        }
        None => SiteConfig::default(),
    };
    let source = experience.map_or(Source::Bundled, Source::File);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.display_name.as_str())
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "questlog",
        options,
        Box::new(|cc| Ok(Box::new(QuestlogApp::new(cc, config, source)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}

// The browser build starts through the library's `#[wasm_bindgen(start)]`.
#[cfg(target_arch = "wasm32")]
fn main() {}
