use chrono::NaiveDate;
use crossterm::event::KeyCode;
use questlog_core::layout::{Layout, ViewKind};
use questlog_core::model::{EmptyReason, Entry, Experience, ExperienceSession, LoadState};
use questlog_core::views::format_period;
use questlog_protocol::SharedStr;

/// One line of the entry list, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: SharedStr,
    pub depth: u32,
    pub title: String,
    pub period: String,
    pub category: Option<SharedStr>,
}

/// Terminal viewer state. Key handling lives here so it can be driven
/// without a terminal.
pub struct App {
    session: ExperienceSession,
    today: NaiveDate,
    rows: Vec<ListRow>,
    cursor: usize,
    quit: bool,
}

impl App {
    pub fn new(session: ExperienceSession, today: NaiveDate) -> Self {
        let mut app = Self {
            session,
            today,
            rows: Vec::new(),
            cursor: 0,
            quit: false,
        };
        app.refresh_rows();
        app
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn view(&self) -> ViewKind {
        self.session.view()
    }

    pub fn category(&self) -> Option<&str> {
        self.session.category().map(SharedStr::as_str)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Entry whose detail panel is open.
    pub fn details(&self) -> Option<&Entry> {
        self.session.selected_entry()
    }

    /// Why the list is empty, when it is.
    pub fn empty_message(&self) -> Option<String> {
        if !self.rows.is_empty() {
            return None;
        }
        Some(match self.session.state() {
            LoadState::Empty(EmptyReason::LoadFailed(e)) => format!("Could not load experience: {e}"),
            LoadState::Empty(EmptyReason::Malformed(e)) => format!("Experience data is malformed: {e}"),
            LoadState::Idle | LoadState::Loading => "Loading…".to_string(),
            _ => "Nothing to show yet.".to_string(),
        })
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.rows.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.rows.get(self.cursor).map(|r| r.id.clone()) {
                    self.session.select(&id);
                }
            }
            KeyCode::Esc => self.session.close_selection(),
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('v') => {
                let next = self.session.view().toggled();
                self.session.set_view(next);
                self.refresh_rows();
            }
            _ => {}
        }
    }

    /// All → first category → … → last category → all.
    fn cycle_category(&mut self) {
        let categories = self.session.categories();
        let next = match self.session.category() {
            None => categories.first(),
            Some(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1)),
        };
        self.session.set_category(next.map(SharedStr::as_str));
        self.cursor = 0;
        self.refresh_rows();
    }

    fn refresh_rows(&mut self) {
        let today = self.today;
        self.rows = self
            .session
            .frame(today)
            .map(|frame| list_rows(frame.experience, frame.layout))
            .unwrap_or_default();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }
}

fn list_rows(experience: &Experience, layout: &Layout) -> Vec<ListRow> {
    let placed: Vec<(usize, u32)> = match layout {
        Layout::Tree(tree) => tree.nodes.iter().map(|n| (n.entry, n.depth)).collect(),
        Layout::Timeline(timeline) => timeline.rows.iter().map(|r| (r.entry, r.depth)).collect(),
    };
    placed
        .into_iter()
        .filter_map(|(index, depth)| {
            let entry = experience.entries.get(index)?;
            Some(ListRow {
                id: entry.id.clone(),
                depth,
                title: entry.title.as_str().to_string(),
                period: format_period(entry.start, entry.end, "present"),
                category: entry.category.clone(),
            })
        })
        .collect()
}
