mod app;
mod banner;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use questlog_core::SiteConfig;
use questlog_core::layout::ViewKind;
use questlog_core::model::ExperienceSession;
use questlog_core::parsers::parse_auto;
use questlog_core::svg::render_svg;
use questlog_core::views::{ViewOptions, render_empty_state, render_layout};
use questlog_protocol::Viewport;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: questlog <experience.json> [--tree] [--svg <out.svg>] [--config <site.json>]";

struct Args {
    experience: PathBuf,
    tree: bool,
    svg: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut experience = None;
    let mut tree = false;
    let mut svg = None;
    let mut config = None;
    let mut raw = raw.into_iter();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--tree" => tree = true,
            "--svg" => svg = Some(PathBuf::from(raw.next().context("--svg needs a path")?)),
            "--config" => config = Some(PathBuf::from(raw.next().context("--config needs a path")?)),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => experience = Some(PathBuf::from(arg)),
        }
    }
    Ok(Args {
        experience: experience.context(USAGE)?,
        tree,
        svg,
        config,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            SiteConfig::from_json(&data).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SiteConfig::default(),
    };

    let data = std::fs::read(&args.experience)
        .with_context(|| format!("reading {}", args.experience.display()))?;
    let experience =
        parse_auto(&data).with_context(|| format!("parsing {}", args.experience.display()))?;
    tracing::info!(entries = experience.len(), "experience parsed");

    let mut session = ExperienceSession::new(config.tree, config.timeline);
    session.set_open_first_category(config.open_first_category);
    session.set_experience(experience);
    if args.tree {
        session.set_view(ViewKind::Tree);
    }
    let today = chrono::Local::now().date_naive();

    if let Some(out) = &args.svg {
        let viewport = Viewport::new(1200.0, 800.0);
        let commands = match session.frame(today) {
            Some(frame) => render_layout(
                frame.experience,
                frame.layout,
                &viewport,
                &ViewOptions::default(),
            ),
            None => render_empty_state(&viewport, "No experience to show"),
        };
        let svg = render_svg(&commands, viewport.width, viewport.height, false);
        std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
        tracing::info!(path = %out.display(), "svg written");
        return Ok(());
    }

    let mut app = app::App::new(session, today);
    let mut banner = banner::Banner::new(&config.display_name, banner::terminal_config());
    renderer::run_tui(&mut app, &mut banner)
}
