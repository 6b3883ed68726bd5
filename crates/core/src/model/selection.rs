use questlog_protocol::SharedStr;

use super::experience::Experience;

/// The entry whose detail panel is open, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<SharedStr>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SharedStr> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Select `id` if it exists in `experience`. Returns whether the
    /// selection was accepted; unknown ids leave the current one untouched.
    pub fn select(&mut self, id: &str, experience: &Experience) -> bool {
        match experience.entry(id) {
            Some(entry) => {
                self.selected = Some(entry.id.clone());
                true
            }
            None => false,
        }
    }

    /// Close the detail panel. Closing with nothing selected is a no-op.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it no longer resolves in `experience`.
    pub fn retain_valid(&mut self, experience: &Experience) {
        if let Some(id) = &self.selected
            && !experience.contains(id)
        {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use chrono::NaiveDate;

    fn exp() -> Experience {
        let d = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap_or_default();
        Experience::new(vec![Entry::new("a", "A", d), Entry::new("b", "B", d)])
    }

    #[test]
    fn select_then_switch_then_close() {
        let exp = exp();
        let mut sel = Selection::new();
        assert!(sel.select("a", &exp));
        assert!(sel.select("b", &exp));
        assert_eq!(sel.selected().map(SharedStr::as_str), Some("b"));
        sel.close();
        assert!(!sel.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let mut sel = Selection::new();
        sel.close();
        sel.close();
        assert_eq!(sel, Selection::new());
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let exp = exp();
        let mut sel = Selection::new();
        assert!(sel.select("a", &exp));
        assert!(!sel.select("zzz", &exp));
        assert_eq!(sel.selected().map(SharedStr::as_str), Some("a"));
    }

    #[test]
    fn retain_drops_vanished_entries() {
        let mut sel = Selection::new();
        assert!(sel.select("a", &exp()));
        sel.retain_valid(&Experience::empty());
        assert!(!sel.is_open());
    }
}
