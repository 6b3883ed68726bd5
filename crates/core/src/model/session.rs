use std::fmt::Display;

use chrono::NaiveDate;
use questlog_protocol::SharedStr;

use super::entry::Entry;
use super::experience::Experience;
use super::selection::Selection;
use crate::layout::{Layout, LayoutError, TimelineConfig, TreeConfig, ViewKind, derive_layout};
use crate::parsers;

/// Why the experience page has nothing to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The document loaded but holds no entries (or none in this category).
    NoEntries,
    /// The fetch itself failed.
    LoadFailed(String),
    /// The document could not be parsed or laid out.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Empty(EmptyReason),
}

/// Identifies one load attempt. Results carrying an older ticket are
/// dropped, so a slow fetch can never overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Borrowed view of a session for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SessionFrame<'a> {
    pub experience: &'a Experience,
    pub layout: &'a Layout,
    pub selected: Option<&'a SharedStr>,
}

/// State of one experience page: the loaded document, the active category
/// and view, the selection, and the layout derived from them.
///
/// The layout is cached and recomputed from scratch whenever its inputs
/// change.
#[derive(Debug, Clone)]
pub struct ExperienceSession {
    source: Experience,
    visible: Experience,
    category: Option<SharedStr>,
    view: ViewKind,
    selection: Selection,
    state: LoadState,
    generation: u64,
    layout: Option<Result<Layout, LayoutError>>,
    layout_now: Option<NaiveDate>,
    tree_config: TreeConfig,
    timeline_config: TimelineConfig,
    open_first_category: bool,
}

impl ExperienceSession {
    pub fn new(tree_config: TreeConfig, timeline_config: TimelineConfig) -> Self {
        Self {
            source: Experience::empty(),
            visible: Experience::empty(),
            category: None,
            view: ViewKind::default(),
            selection: Selection::new(),
            state: LoadState::Idle,
            generation: 0,
            layout: None,
            layout_now: None,
            tree_config,
            timeline_config,
            open_first_category: false,
        }
    }

    /// Session with an already-parsed experience (tests, the TUI, the wasm
    /// bridge).
    pub fn from_experience(
        experience: Experience,
        tree_config: TreeConfig,
        timeline_config: TimelineConfig,
    ) -> Self {
        let mut session = Self::new(tree_config, timeline_config);
        session.set_experience(experience);
        session
    }

    /// Start a new load. Any result still in flight for an earlier ticket
    /// will be ignored.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Deliver the outcome of a fetch. Returns `false` when the ticket is
    /// stale and the result was discarded.
    ///
    /// Failures never propagate: a rejected fetch or an unreadable document
    /// leaves an empty experience behind.
    pub fn finish_load<E: Display>(&mut self, ticket: LoadTicket, result: Result<Vec<u8>, E>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "dropping stale load");
            return false;
        }
        match result {
            Ok(bytes) => match parsers::parse_auto(&bytes) {
                Ok(experience) => {
                    tracing::info!(entries = experience.len(), "experience loaded");
                    self.set_experience(experience);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "experience document rejected");
                    self.set_experience(Experience::empty());
                    self.state = LoadState::Empty(EmptyReason::Malformed(e.to_string()));
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "experience fetch failed");
                self.set_experience(Experience::empty());
                self.state = LoadState::Empty(EmptyReason::LoadFailed(e.to_string()));
            }
        }
        true
    }

    /// Start documents that declare tracks (or categories) on their first
    /// one instead of showing everything.
    pub fn set_open_first_category(&mut self, on: bool) {
        self.open_first_category = on;
    }

    /// Replace the document and reset category and selection.
    pub fn set_experience(&mut self, experience: Experience) {
        self.category = if self.open_first_category {
            experience.tracks.first().map(|t| t.id.clone())
        } else {
            None
        };
        self.source = experience;
        self.selection.close();
        self.refilter();
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Entries currently shown (the active category's subset).
    pub fn experience(&self) -> &Experience {
        &self.visible
    }

    /// The whole loaded document.
    pub fn source(&self) -> &Experience {
        &self.source
    }

    pub fn categories(&self) -> Vec<SharedStr> {
        self.source.categories()
    }

    pub fn category(&self) -> Option<&SharedStr> {
        self.category.as_ref()
    }

    /// Switch the active category (`None` shows everything) and recompute.
    pub fn set_category(&mut self, category: Option<&str>) {
        let next = category.map(SharedStr::from);
        if next == self.category {
            return;
        }
        self.category = next;
        self.refilter();
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn set_view(&mut self, view: ViewKind) {
        if view != self.view {
            self.view = view;
            self.invalidate();
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selection
            .selected()
            .and_then(|id| self.visible.entry(id))
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.selection.select(id, &self.visible)
    }

    pub fn close_selection(&mut self) {
        self.selection.close();
    }

    /// Layout for the current inputs, recomputed if anything changed since
    /// the last call. `None` when there is nothing to draw.
    pub fn layout(&mut self, now: NaiveDate) -> Option<&Layout> {
        self.refresh(now);
        match &self.layout {
            Some(Ok(layout)) if !layout.is_empty() => Some(layout),
            _ => None,
        }
    }

    /// Everything a view needs to draw one frame, borrowed together.
    pub fn frame(&mut self, now: NaiveDate) -> Option<SessionFrame<'_>> {
        self.refresh(now);
        match &self.layout {
            Some(Ok(layout)) if !layout.is_empty() => Some(SessionFrame {
                experience: &self.visible,
                layout,
                selected: self.selection.selected(),
            }),
            _ => None,
        }
    }

    /// The layout error from the last derivation, if it failed.
    pub fn layout_error(&self) -> Option<&LayoutError> {
        match &self.layout {
            Some(Err(e)) => Some(e),
            _ => None,
        }
    }

    fn refilter(&mut self) {
        self.visible = self.source.filter_category(self.category.as_deref());
        self.selection.retain_valid(&self.visible);
        self.state = if self.visible.is_empty() {
            LoadState::Empty(EmptyReason::NoEntries)
        } else {
            LoadState::Ready
        };
        self.invalidate();
    }

    fn refresh(&mut self, now: NaiveDate) {
        let stale = self.layout.is_none()
            || (self.view == ViewKind::Timeline && self.layout_now != Some(now));
        if stale {
            self.recompute(now);
        }
    }

    fn invalidate(&mut self) {
        self.layout = None;
        self.layout_now = None;
    }

    fn recompute(&mut self, now: NaiveDate) {
        let result = derive_layout(
            &self.visible,
            self.view,
            &self.tree_config,
            &self.timeline_config,
            now,
        );
        if let Err(e) = &result {
            tracing::warn!(error = %e, "layout failed, showing empty state");
            self.state = LoadState::Empty(EmptyReason::Malformed(e.to_string()));
        }
        self.layout = Some(result);
        self.layout_now = Some(now);
    }
}

impl Default for ExperienceSession {
    fn default() -> Self {
        Self::new(TreeConfig::default(), TimelineConfig::default())
    }
}
