use serde_json::Value;

use crate::config::GridConfig;
use crate::state::bulk_edit::{BulkEditApplier, HeaderEdit, HeaderEditOutcome};
use crate::state::data_model::{Column, Dataset, DraftValue, Row};
use crate::state::debounce::{DebounceHandle, Debouncer};
use crate::state::error::LoadError;
use crate::state::events::GridEvent;
use crate::state::navigation::{self, CellRef, Direction};
use crate::state::row_store::RowStore;
use crate::state::selection::{SelectAllState, SelectionTracker};
use crate::state::virtual_window::{VirtualWindow, WindowRange};
use crate::state::visibility::VisibilityEngine;

/// The editable grid: original and working rows, row-scoping, search,
/// selection, header edits and the render window, owned in one place.
///
/// Every accessor hands out copies or shared borrows; all mutation goes through
/// the methods below.
#[derive(Clone, Debug)]
pub struct GridState {
    config: GridConfig,
    store: RowStore,
    visibility: VisibilityEngine,
    selection: SelectionTracker,
    header_edit: HeaderEdit,
    window: VirtualWindow,
    search: Debouncer<String>,
    scroll_rewinds: u64,
    events: Vec<GridEvent>,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridState {
    pub fn new(config: GridConfig) -> Self {
        let window = VirtualWindow::new(
            config.row_height,
            config.buffer_rows,
            config.window_threshold,
        );
        Self {
            config,
            store: RowStore::new(),
            visibility: VisibilityEngine::new(),
            selection: SelectionTracker::new(),
            header_edit: HeaderEdit::Idle,
            window,
            search: Debouncer::new(),
            scroll_rewinds: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    // ===== Loading and reset =====

    pub fn load(&mut self, dataset: Dataset) -> Result<(), LoadError> {
        let columns: Vec<Column> = dataset
            .columns
            .into_iter()
            .map(|spec| spec.into_column())
            .collect();
        let column_count = columns.len();

        if let Err(err) = self.store.load(dataset.rows, columns, &self.config.id_field) {
            tracing::warn!(error = %err, "rejected dataset");
            return Err(err);
        }

        let had_selection = self.selection.deselect_all();
        self.restore_load_defaults(had_selection);
        tracing::info!(rows = self.store.len(), columns = column_count, "loaded dataset");
        Ok(())
    }

    pub fn load_value(&mut self, value: Value) -> Result<(), LoadError> {
        let dataset: Dataset =
            serde_json::from_value(value).map_err(|err| LoadError::Malformed(err.to_string()))?;
        self.load(dataset)
    }

    /// Discards every edit and returns scoping, selection and search to their
    /// load-time defaults.
    pub fn reset_to_original(&mut self) {
        self.store.reset_to_original();
        let had_selection = self.selection.deselect_all();
        self.restore_load_defaults(had_selection);
        tracing::info!(rows = self.store.len(), "reset to original");
    }

    fn restore_load_defaults(&mut self, selection_cleared: bool) {
        self.visibility.reset(self.store.row_ids());
        self.header_edit = HeaderEdit::Idle;
        self.search.cancel_pending();
        let total = self.store.len();
        self.rewind_window(total);
        if selection_cleared {
            self.emit_selection_changed();
        }
    }

    // ===== Snapshots =====

    pub fn columns(&self) -> &[Column] {
        self.store.columns()
    }

    pub fn column(&self, field_id: &str) -> Option<&Column> {
        self.store.column(field_id)
    }

    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.store.get(row_id)
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn working_data(&self) -> Vec<Row> {
        self.store.rows().to_vec()
    }

    pub fn original_data(&self) -> Vec<Row> {
        self.store.original_rows().to_vec()
    }

    pub fn modified_rows(&self) -> Vec<Row> {
        self.store.modified_rows()
    }

    pub fn selected_row_ids(&self) -> Vec<String> {
        self.selection.ordered_ids(self.store.rows())
    }

    pub fn edited_cell_keys(&self) -> Vec<String> {
        self.store
            .dirty_keys()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn is_cell_dirty(&self, row_id: &str, field_id: &str) -> bool {
        self.store.is_dirty(row_id, field_id)
    }

    pub fn is_row_dirty(&self, row_id: &str) -> bool {
        self.store.is_row_dirty(row_id)
    }

    pub fn modified_row_count(&self) -> usize {
        self.store.modified_rows().len()
    }

    /// Rows shown right now, in original order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visibility
            .visible_rows(self.store.rows(), self.store.columns())
    }

    pub fn visible_row_ids(&self) -> Vec<String> {
        self.visible_rows()
            .into_iter()
            .map(|row| row.id.clone())
            .collect()
    }

    // ===== Single-cell edits =====

    /// Writes `value` into one cell. Unknown rows or fields are ignored.
    pub fn set_cell_value(&mut self, row_id: &str, field_id: &str, value: Value) -> bool {
        let Some(old_value) = self.store.set_value(row_id, field_id, value.clone()) else {
            tracing::debug!(row_id, field_id, "ignored write to unknown cell");
            return false;
        };
        self.events.push(GridEvent::CellChanged {
            row_id: row_id.to_string(),
            field_id: field_id.to_string(),
            old_value,
            new_value: value,
        });
        self.sync_window();
        true
    }

    pub fn set_cell_from_input(&mut self, row_id: &str, field_id: &str, raw: &str) -> bool {
        self.set_cell_from_draft(row_id, field_id, &DraftValue::Text(raw.to_string()))
    }

    pub fn set_cell_from_draft(
        &mut self,
        row_id: &str,
        field_id: &str,
        draft: &DraftValue,
    ) -> bool {
        let Some(column) = self.store.column(field_id) else {
            return false;
        };
        let value = column.coerce_draft(draft);
        self.set_cell_value(row_id, field_id, value)
    }

    // ===== Selection =====

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selection.is_selected(row_id)
    }

    pub fn select_row(&mut self, row_id: &str) -> bool {
        if !self.store.contains(row_id) {
            return false;
        }
        let changed = self.selection.select(row_id);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn deselect_row(&mut self, row_id: &str) -> bool {
        let changed = self.selection.deselect(row_id);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn toggle_row(&mut self, row_id: &str) -> bool {
        if self.is_selected(row_id) {
            self.deselect_row(row_id)
        } else {
            self.select_row(row_id)
        }
    }

    pub fn select_all_visible(&mut self) -> bool {
        let visible = self.visible_row_ids();
        let changed = self.selection.select_all(visible.iter().map(String::as_str));
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = self.selection.deselect_all();
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    /// Header checkbox: clears the selection when every shown row is checked,
    /// otherwise checks every shown row.
    pub fn toggle_select_all(&mut self) -> bool {
        if self.select_all_state().checked {
            self.deselect_all()
        } else {
            self.select_all_visible()
        }
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let visible = self.visible_rows();
        self.selection
            .select_all_state(visible.iter().map(|row| row.id.as_str()))
    }

    fn emit_selection_changed(&mut self) {
        let selected_ids = self.selected_row_ids();
        tracing::debug!(selected = selected_ids.len(), "selection changed");
        self.events.push(GridEvent::SelectionChanged { selected_ids });
    }

    // ===== Row scoping =====

    pub fn is_hidden(&self, row_id: &str) -> bool {
        self.visibility.is_hidden(row_id)
    }

    pub fn hidden_count(&self) -> usize {
        self.visibility.hidden_count()
    }

    /// Hides every selected row. Selection entries are kept.
    pub fn hide_selected(&mut self) -> usize {
        let selected = self.selected_row_ids();
        self.hide_rows(&selected)
    }

    pub fn hide_rows<S: AsRef<str>>(&mut self, row_ids: &[S]) -> usize {
        let selection = &self.selection;
        let hidden = self.visibility.hide(
            row_ids.iter().map(|id| id.as_ref()),
            |id| selection.is_selected(id),
        );
        if hidden > 0 {
            tracing::info!(hidden, total_hidden = self.visibility.hidden_count(), "hid rows");
            self.sync_window();
        }
        hidden
    }

    /// Brings every hidden row back with the selection it had when hidden and
    /// clears the search term.
    pub fn unhide_all(&mut self) -> usize {
        let restored = self.visibility.hidden_count();
        let reselect = self.visibility.unhide_all();
        self.search.cancel_pending();

        let mut selection_changed = false;
        for id in &reselect {
            selection_changed |= self.selection.select(id);
        }
        if selection_changed {
            self.emit_selection_changed();
        }

        tracing::info!(restored, reselected = reselect.len(), "unhid all rows");
        let total = self.visible_rows().len();
        self.rewind_window(total);
        restored
    }

    // ===== Header edit =====

    pub fn header_edit(&self) -> &HeaderEdit {
        &self.header_edit
    }

    pub fn begin_header_edit(&mut self, field_id: &str) -> bool {
        let column = self.store.column(field_id);
        self.header_edit.begin(column)
    }

    pub fn set_header_draft(&mut self, draft: DraftValue) -> bool {
        self.header_edit.set_draft(draft)
    }

    pub fn cancel_header_edit(&mut self) -> bool {
        self.header_edit.cancel()
    }

    /// Applies the draft to the effective edit scope and returns to idle. A
    /// field that no longer exists cancels instead.
    pub fn confirm_header_edit(&mut self) -> HeaderEditOutcome {
        let Some((field_id, draft)) = self.header_edit.take() else {
            return HeaderEditOutcome::Cancelled;
        };
        let Some(column) = self.store.column(&field_id).cloned() else {
            tracing::debug!(field_id = %field_id, "header edit on unknown field cancelled");
            return HeaderEditOutcome::Cancelled;
        };

        let visible = self.visible_row_ids();
        let scope = BulkEditApplier::resolve_scope(&self.selection, &visible);
        let changes = BulkEditApplier::apply(&mut self.store, &column, &draft, &scope);
        tracing::info!(
            field_id = %column.field_id,
            scope = scope.len(),
            "applied header edit"
        );

        self.events
            .extend(changes.iter().cloned().map(GridEvent::from));
        self.sync_window();
        HeaderEditOutcome::Applied(changes)
    }

    // ===== Search =====

    pub fn search_term(&self) -> &str {
        self.visibility.search_term()
    }

    pub fn pending_search(&self) -> Option<&str> {
        self.search.pending_action().map(String::as_str)
    }

    /// Schedules a search commit after the configured delay, superseding any
    /// commit still pending.
    pub fn queue_search(&mut self, term: impl Into<String>) -> DebounceHandle {
        self.search.schedule(self.config.search_debounce(), term.into())
    }

    /// Commits the search queued under `handle`. Stale handles do nothing.
    pub fn commit_search(&mut self, handle: DebounceHandle) -> bool {
        match self.search.fire(handle) {
            Some(term) => {
                self.apply_search(&term);
                true
            }
            None => {
                tracing::debug!("dropped superseded search commit");
                false
            }
        }
    }

    pub fn set_search_now(&mut self, term: &str) {
        self.search.cancel_pending();
        self.apply_search(term);
    }

    fn apply_search(&mut self, term: &str) {
        self.visibility.set_search_term(term);
        let total = self.visible_rows().len();
        self.rewind_window(total);
        tracing::debug!(term = self.visibility.search_term(), visible = total, "search committed");
    }

    // ===== Windowing =====

    pub fn scroll_to(&mut self, scroll_offset: f64, viewport_height: f64) -> bool {
        let total = self.visible_rows().len();
        self.window.update(scroll_offset, viewport_height, total)
    }

    pub fn window(&self) -> WindowRange {
        self.window.range()
    }

    pub fn is_windowed(&self) -> bool {
        self.window.is_windowed()
    }

    pub fn window_padding(&self) -> (f64, f64) {
        self.window.padding()
    }

    /// Visible rows inside the current window, paired with their display index.
    pub fn window_rows(&self) -> Vec<(usize, &Row)> {
        let range = self.window.range();
        self.visible_rows()
            .into_iter()
            .enumerate()
            .skip(range.start)
            .take(range.len())
            .collect()
    }

    /// Bumped every time the window jumps back to the top, so the view can move
    /// its scroll position along with it.
    pub fn scroll_rewinds(&self) -> u64 {
        self.scroll_rewinds
    }

    fn rewind_window(&mut self, total: usize) {
        self.window.reset_to_top(total);
        self.scroll_rewinds += 1;
    }

    fn sync_window(&mut self) {
        let total = self.visible_rows().len();
        self.window.set_total(total);
    }

    // ===== Navigation =====

    pub fn neighbor_cell(
        &self,
        row_id: &str,
        field_id: &str,
        direction: Direction,
    ) -> Option<CellRef> {
        let order = self.visible_row_ids();
        navigation::neighbor(&order, &CellRef::new(row_id, field_id), direction)
    }

    // ===== Notifications =====

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }
}
