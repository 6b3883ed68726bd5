use std::sync::Mutex;

use chrono::NaiveDate;
use questlog_core::layout::ViewKind;
use questlog_core::model::ExperienceSession;
use questlog_core::parsers::date::parse_date;
use questlog_core::prefs::{Theme, ThemeMode};
use questlog_core::views::{ViewOptions, hit_test, render_empty_state, render_layout};
use questlog_protocol::{Point, RenderCommand, SharedStr, Viewport};
use wasm_bindgen::prelude::*;

static SESSIONS: Mutex<Vec<ExperienceSession>> = Mutex::new(Vec::new());

/// Install the panic hook and route `tracing` to the browser console.
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }
}

/// Parse an experience document from bytes (JSON). Returns a handle for
/// later calls. A malformed document still yields a handle whose views
/// render the empty state.
#[wasm_bindgen]
pub fn load_experience(data: &[u8]) -> usize {
    let mut session = ExperienceSession::default();
    let ticket = session.begin_load();
    session.finish_load::<String>(ticket, Ok(data.to_vec()));
    tracing::info!(entries = session.source().len(), "experience loaded");

    let mut sessions = SESSIONS.lock().unwrap_or_else(|e| e.into_inner());
    sessions.push(session);
    sessions.len() - 1
}

/// Category ids of a loaded document, as a JSON array.
#[wasm_bindgen]
pub fn experience_categories(handle: usize) -> Result<String, JsError> {
    with_session(handle, |s| categories_json(s)).map_err(|e| JsError::new(&e))
}

/// Render a view, returning render commands as JSON.
///
/// `view` is `"timeline"` or `"tree"`; `now` is an ISO date, or empty for
/// today.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn render_view(
    handle: usize,
    view: &str,
    category: Option<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    dpr: f64,
    selected: Option<String>,
    now: &str,
) -> Result<String, JsError> {
    let request = RenderRequest {
        view,
        category: category.as_deref(),
        viewport: Viewport {
            x,
            y,
            width,
            height,
            dpr,
        },
        selected: selected.as_deref(),
        now,
        present_label: "present",
    };
    with_session(handle, |s| render_json(s, &request))
        .and_then(|r| r)
        .map_err(|e| JsError::new(&e))
}

/// Entry id under a point of a previously rendered command list.
#[wasm_bindgen]
pub fn hit_test_commands(commands_json: &str, x: f64, y: f64) -> Result<Option<String>, JsError> {
    hit_json(commands_json, x, y).map_err(|e| JsError::new(&e))
}

/// Full entry as JSON, for a detail panel.
#[wasm_bindgen]
pub fn entry_details(handle: usize, id: &str) -> Result<Option<String>, JsError> {
    with_session(handle, |s| {
        s.source()
            .entry(id)
            .map(|e| serde_json::to_string(e).map_err(|e| e.to_string()))
            .transpose()
    })
    .and_then(|r| r)
    .map_err(|e| JsError::new(&e))
}

/// light → dark → auto → light
#[wasm_bindgen]
pub fn next_theme_mode(mode: &str) -> Result<String, JsError> {
    cycle(mode).map_err(|e| JsError::new(&e))
}

/// Effective theme (`"light"` or `"dark"`) for a mode and the platform's
/// preference, when known.
#[wasm_bindgen]
pub fn resolve_theme(mode: &str, system_dark: Option<bool>) -> Result<String, JsError> {
    resolve(mode, system_dark).map_err(|e| JsError::new(&e))
}

struct RenderRequest<'a> {
    view: &'a str,
    category: Option<&'a str>,
    viewport: Viewport,
    selected: Option<&'a str>,
    now: &'a str,
    present_label: &'a str,
}

fn with_session<R>(handle: usize, f: impl FnOnce(&mut ExperienceSession) -> R) -> Result<R, String> {
    let mut sessions = SESSIONS.lock().unwrap_or_else(|e| e.into_inner());
    sessions
        .get_mut(handle)
        .map(f)
        .ok_or_else(|| format!("invalid experience handle {handle}"))
}

fn categories_json(session: &ExperienceSession) -> String {
    let categories = session.categories();
    let ids: Vec<&str> = categories.iter().map(SharedStr::as_str).collect();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".into())
}

fn render_json(session: &mut ExperienceSession, req: &RenderRequest<'_>) -> Result<String, String> {
    let view = ViewKind::parse(req.view).ok_or_else(|| format!("unknown view: {}", req.view))?;
    let now = if req.now.is_empty() {
        chrono::Utc::now().date_naive()
    } else {
        parse_date(req.now).map_err(|e| e.to_string())?
    };
    let commands = render_commands(session, view, req, now);
    serde_json::to_string(&commands).map_err(|e| e.to_string())
}

fn render_commands(
    session: &mut ExperienceSession,
    view: ViewKind,
    req: &RenderRequest<'_>,
    now: NaiveDate,
) -> Vec<RenderCommand> {
    session.set_view(view);
    session.set_category(req.category);
    match req.selected {
        Some(id) => {
            session.select(id);
        }
        None => session.close_selection(),
    }
    match session.frame(now) {
        Some(frame) => {
            let options = ViewOptions {
                selected: frame.selected.map(SharedStr::as_str),
                present_label: req.present_label,
            };
            render_layout(frame.experience, frame.layout, &req.viewport, &options)
        }
        None => render_empty_state(&req.viewport, "No experience to show"),
    }
}

fn hit_json(commands_json: &str, x: f64, y: f64) -> Result<Option<String>, String> {
    let commands: Vec<RenderCommand> =
        serde_json::from_str(commands_json).map_err(|e| e.to_string())?;
    Ok(hit_test(&commands, Point::new(x, y)).map(|id| id.as_str().to_string()))
}

fn cycle(mode: &str) -> Result<String, String> {
    let mode = ThemeMode::parse(mode).ok_or_else(|| format!("unknown theme mode: {mode}"))?;
    Ok(mode.next().as_str().to_string())
}

fn resolve(mode: &str, system_dark: Option<bool>) -> Result<String, String> {
    let mode = ThemeMode::parse(mode).ok_or_else(|| format!("unknown theme mode: {mode}"))?;
    let system = system_dark.map(|dark| if dark { Theme::Dark } else { Theme::Light });
    Ok(mode.resolve(system).as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[u8] = br#"{ "quests": [
        { "id": "uni", "title": "University", "startDate": "2014-09", "endDate": "2018-06", "type": "main" },
        { "id": "job", "title": "Backend dev", "startDate": "2018-09", "type": "main" },
        { "id": "jam", "title": "Game jam", "startDate": "2016-04", "father": "uni", "type": "side" }
    ] }"#;

    fn request<'a>(view: &'a str, selected: Option<&'a str>) -> RenderRequest<'a> {
        RenderRequest {
            view,
            category: None,
            viewport: Viewport::new(800.0, 600.0),
            selected,
            now: "2024-01-01",
            present_label: "present",
        }
    }

    #[test]
    fn render_and_hit_test_round_trip() {
        let handle = load_experience(DOC);
        let json = with_session(handle, |s| render_json(s, &request("timeline", Some("job"))))
            .unwrap()
            .unwrap();
        let commands: Vec<RenderCommand> = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = commands
            .iter()
            .filter_map(|c| c.entry_id().map(SharedStr::as_str))
            .collect();
        assert!(ids.contains(&"job"));
        assert!(json.contains("Backend dev"));
    }

    #[test]
    fn tree_view_and_unknown_view() {
        let handle = load_experience(DOC);
        let tree = with_session(handle, |s| render_json(s, &request("tree", None))).unwrap();
        assert!(tree.is_ok());
        let bad = with_session(handle, |s| render_json(s, &request("radar", None))).unwrap();
        assert!(bad.is_err());
        assert!(with_session(usize::MAX, |_| ()).is_err());
    }

    #[test]
    fn malformed_document_renders_empty_state() {
        let handle = load_experience(b"{ broken");
        let json = with_session(handle, |s| render_json(s, &request("timeline", None)))
            .unwrap()
            .unwrap();
        assert!(json.contains("No experience to show"));
        assert_eq!(hit_json(&json, 400.0, 300.0), Ok(None));
    }

    #[test]
    fn theme_helpers() {
        assert_eq!(cycle("light").unwrap(), "dark");
        assert_eq!(cycle("auto").unwrap(), "light");
        assert!(cycle("sepia").is_err());
        assert_eq!(resolve("auto", Some(true)).unwrap(), "dark");
        assert_eq!(resolve("auto", None).unwrap(), "light");
        assert_eq!(resolve("light", Some(true)).unwrap(), "light");
    }

    #[test]
    fn categories_come_from_entry_tags() {
        let handle = load_experience(DOC);
        let json = with_session(handle, |s| categories_json(s)).unwrap();
        assert_eq!(json, r#"["main","side"]"#);
    }
}
