use serde_json::Value;

use crate::state::data_model::{Column, DraftValue};
use crate::state::row_store::RowStore;
use crate::state::selection::SelectionTracker;

/// Header-level edit mode. `Applying` and `Cancelled` are transient and always
/// settle back to `Idle`, so only the two resting states are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HeaderEdit {
    #[default]
    Idle,
    Editing {
        field_id: String,
        draft: DraftValue,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellChange {
    pub row_id: String,
    pub field_id: String,
    pub old_value: Value,
    pub new_value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HeaderEditOutcome {
    Applied(Vec<CellChange>),
    Cancelled,
}

impl HeaderEdit {
    /// Enters edit mode for `column` with the type's zero draft. A missing
    /// column leaves the state idle.
    pub fn begin(&mut self, column: Option<&Column>) -> bool {
        let Some(column) = column else {
            *self = HeaderEdit::Idle;
            return false;
        };
        *self = HeaderEdit::Editing {
            field_id: column.field_id.clone(),
            draft: DraftValue::zero_for(column.data_type),
        };
        true
    }

    pub fn set_draft(&mut self, value: DraftValue) -> bool {
        match self {
            HeaderEdit::Editing { draft, .. } => {
                *draft = value;
                true
            }
            HeaderEdit::Idle => false,
        }
    }

    pub fn cancel(&mut self) -> bool {
        let was_editing = self.is_editing();
        *self = HeaderEdit::Idle;
        was_editing
    }

    /// Leaves edit mode, handing back the field and draft if there was one.
    pub fn take(&mut self) -> Option<(String, DraftValue)> {
        match std::mem::take(self) {
            HeaderEdit::Editing { field_id, draft } => Some((field_id, draft)),
            HeaderEdit::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, HeaderEdit::Editing { .. })
    }

    pub fn field_id(&self) -> Option<&str> {
        match self {
            HeaderEdit::Editing { field_id, .. } => Some(field_id),
            HeaderEdit::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&DraftValue> {
        match self {
            HeaderEdit::Editing { draft, .. } => Some(draft),
            HeaderEdit::Idle => None,
        }
    }
}

pub struct BulkEditApplier;

impl BulkEditApplier {
    /// Rows a header edit touches: the selected rows among `visible_ids` when
    /// anything is selected, otherwise every visible row. Ids outside
    /// `visible_ids` can never be returned.
    pub fn resolve_scope(selection: &SelectionTracker, visible_ids: &[String]) -> Vec<String> {
        if selection.is_empty() {
            return visible_ids.to_vec();
        }
        visible_ids
            .iter()
            .filter(|id| selection.is_selected(id))
            .cloned()
            .collect()
    }

    /// Writes the converted draft into every row of `scope`, in order.
    pub fn apply(
        store: &mut RowStore,
        column: &Column,
        draft: &DraftValue,
        scope: &[String],
    ) -> Vec<CellChange> {
        let new_value = column.coerce_draft(draft);
        scope
            .iter()
            .filter_map(|row_id| {
                let old_value = store.set_value(row_id, &column.field_id, new_value.clone())?;
                Some(CellChange {
                    row_id: row_id.clone(),
                    field_id: column.field_id.clone(),
                    old_value,
                    new_value: new_value.clone(),
                })
            })
            .collect()
    }
}
