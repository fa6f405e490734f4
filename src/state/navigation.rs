#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row_id: String,
    pub field_id: String,
}

impl CellRef {
    pub fn new(row_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            field_id: field_id.into(),
        }
    }
}

/// Same field, one row up or down in the display order. `None` at either end
/// or when the row is not displayed.
pub fn neighbor<S: AsRef<str>>(
    display_order: &[S],
    cell: &CellRef,
    direction: Direction,
) -> Option<CellRef> {
    let position = display_order
        .iter()
        .position(|id| id.as_ref() == cell.row_id)?;
    let target = match direction {
        Direction::Up => position.checked_sub(1)?,
        Direction::Down => position + 1,
    };
    display_order
        .get(target)
        .map(|id| CellRef::new(id.as_ref(), cell.field_id.clone()))
}
