use serde_json::Value;

use crate::state::bulk_edit::CellChange;

/// Notifications emitted by the grid, drained by the host in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    CellChanged {
        row_id: String,
        field_id: String,
        old_value: Value,
        new_value: Value,
    },
    SelectionChanged {
        selected_ids: Vec<String>,
    },
}

impl From<CellChange> for GridEvent {
    fn from(change: CellChange) -> Self {
        GridEvent::CellChanged {
            row_id: change.row_id,
            field_id: change.field_id,
            old_value: change.old_value,
            new_value: change.new_value,
        }
    }
}
