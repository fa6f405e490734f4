use std::collections::{HashMap, HashSet};

use crate::state::data_model::{Column, Row};

/// Derives which rows are shown from two independent predicates: row-scoping
/// (hide/unhide) and the search term.
///
/// Every known row id lives in exactly one of `in_scope` or `hidden`. The
/// `hidden` map remembers whether the row was selected when it was hidden.
#[derive(Clone, Debug, Default)]
pub struct VisibilityEngine {
    in_scope: HashSet<String>,
    hidden: HashMap<String, bool>,
    search_term: String,
}

impl VisibilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts every id back in scope and clears the search term.
    pub fn reset<'a>(&mut self, row_ids: impl IntoIterator<Item = &'a str>) {
        self.in_scope = row_ids.into_iter().map(str::to_string).collect();
        self.hidden.clear();
        self.search_term.clear();
    }

    /// Hides the given rows, remembering their selection flag. Ids that are
    /// already hidden or unknown are skipped. Returns how many rows were hidden.
    pub fn hide<'a, I, F>(&mut self, row_ids: I, was_selected: F) -> usize
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&str) -> bool,
    {
        let mut hidden = 0;
        for id in row_ids {
            if self.in_scope.remove(id) {
                self.hidden.insert(id.to_string(), was_selected(id));
                hidden += 1;
            }
        }
        hidden
    }

    /// Brings every hidden row back and clears the search term. Returns the ids
    /// that were selected when they were hidden.
    pub fn unhide_all(&mut self) -> HashSet<String> {
        let mut reselect = HashSet::new();
        for (id, was_selected) in self.hidden.drain() {
            if was_selected {
                reselect.insert(id.clone());
            }
            self.in_scope.insert(id);
        }
        self.search_term.clear();
        reselect
    }

    /// Stores the trimmed, case-folded term. Returns whether it changed.
    pub fn set_search_term(&mut self, term: &str) -> bool {
        let folded = term.trim().to_lowercase();
        if folded == self.search_term {
            return false;
        }
        self.search_term = folded;
        true
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_hidden(&self, row_id: &str) -> bool {
        self.hidden.contains_key(row_id)
    }

    pub fn is_in_scope(&self, row_id: &str) -> bool {
        self.in_scope.contains(row_id)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn hidden_selection_flag(&self, row_id: &str) -> Option<bool> {
        self.hidden.get(row_id).copied()
    }

    pub fn row_matches_search(&self, row: &Row, columns: &[Column]) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        columns.iter().any(|column| {
            column
                .search_text(row.get(&column.field_id))
                .map(|text| text.contains(&self.search_term))
                .unwrap_or(false)
        })
    }

    /// Rows in original order that are in scope and match the search term.
    /// Hidden rows are rejected before the search predicate runs.
    pub fn visible_rows<'a>(&self, rows: &'a [Row], columns: &[Column]) -> Vec<&'a Row> {
        rows.iter()
            .filter(|row| self.is_in_scope(&row.id) && self.row_matches_search(row, columns))
            .collect()
    }
}
