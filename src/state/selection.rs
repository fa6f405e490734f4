use std::collections::HashSet;

use crate::state::data_model::Row;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectAllState {
    pub checked: bool,
    pub indeterminate: bool,
}

/// Checked row ids. Entries survive hiding so that a hide followed by an
/// unhide restores the exact checked state.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    selected: HashSet<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, row_id: &str) -> bool {
        self.selected.insert(row_id.to_string())
    }

    pub fn deselect(&mut self, row_id: &str) -> bool {
        self.selected.remove(row_id)
    }

    pub fn select_all<'a>(&mut self, visible_ids: impl IntoIterator<Item = &'a str>) -> bool {
        let mut changed = false;
        for id in visible_ids {
            changed |= self.selected.insert(id.to_string());
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selected.contains(row_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Header checkbox state, computed from the rows currently shown.
    pub fn select_all_state<'a>(
        &self,
        visible_ids: impl IntoIterator<Item = &'a str>,
    ) -> SelectAllState {
        let mut total = 0usize;
        let mut selected = 0usize;
        for id in visible_ids {
            total += 1;
            if self.is_selected(id) {
                selected += 1;
            }
        }
        SelectAllState {
            checked: total > 0 && selected == total,
            indeterminate: selected > 0 && selected < total,
        }
    }

    /// Selected ids in the order the rows appear.
    pub fn ordered_ids(&self, rows: &[Row]) -> Vec<String> {
        rows.iter()
            .filter(|row| self.is_selected(&row.id))
            .map(|row| row.id.clone())
            .collect()
    }
}
