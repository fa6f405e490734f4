use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde_json::Value;

use crate::state::data_model::{Column, Row};
use crate::state::error::LoadError;

/// Composite key of a single cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row_id: String,
    pub field_id: String,
}

impl CellKey {
    pub fn new(row_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            field_id: field_id.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.row_id, self.field_id)
    }
}

/// Original and working row collections plus the dirty-cell ledger.
///
/// `original` and `working` always carry the same ids in the same order; only
/// values differ. `index` maps a row id to its position in both. The identifier
/// field stays readable in `fields` but is never written.
#[derive(Clone, Debug, Default)]
pub struct RowStore {
    columns: Vec<Column>,
    original: Vec<Row>,
    working: Vec<Row>,
    index: HashMap<String, usize>,
    id_field: String,
    dirty: HashSet<CellKey>,
    dirty_per_row: HashMap<String, usize>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new dataset. Validation happens before anything is replaced.
    pub fn load(
        &mut self,
        rows: Vec<Value>,
        columns: Vec<Column>,
        id_field: &str,
    ) -> Result<(), LoadError> {
        let mut seen_columns = HashSet::new();
        for column in &columns {
            if !seen_columns.insert(column.field_id.as_str()) {
                return Err(LoadError::DuplicateColumn(column.field_id.clone()));
            }
        }

        let mut parsed = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        for (position, raw) in rows.into_iter().enumerate() {
            let Value::Object(object) = raw else {
                return Err(LoadError::RowNotAnObject { index: position });
            };
            let id = match object.get(id_field) {
                None => return Err(LoadError::MissingIdentifier { index: position }),
                Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
                Some(_) => return Err(LoadError::InvalidIdentifier { index: position }),
            };
            if index.insert(id.clone(), position).is_some() {
                return Err(LoadError::DuplicateIdentifier(id));
            }
            parsed.push(Row {
                id,
                fields: object.into_iter().collect(),
            });
        }

        self.columns = columns;
        self.working = parsed.clone();
        self.original = parsed;
        self.index = index;
        self.id_field = id_field.to_string();
        self.dirty.clear();
        self.dirty_per_row.clear();
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field_id == field_id)
    }

    pub fn rows(&self) -> &[Row] {
        &self.working
    }

    pub fn original_rows(&self) -> &[Row] {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn contains(&self, row_id: &str) -> bool {
        self.index.contains_key(row_id)
    }

    pub fn position(&self, row_id: &str) -> Option<usize> {
        self.index.get(row_id).copied()
    }

    pub fn row_ids(&self) -> impl Iterator<Item = &str> {
        self.working.iter().map(|row| row.id.as_str())
    }

    pub fn get(&self, row_id: &str) -> Option<&Row> {
        let position = self.position(row_id)?;
        self.working.get(position)
    }

    /// Writes a value into the working row and returns the value it replaced.
    /// Unknown rows, unknown fields and the identifier field are ignored.
    pub fn set_value(&mut self, row_id: &str, field_id: &str, value: Value) -> Option<Value> {
        if field_id == self.id_field {
            tracing::debug!(row_id, field_id, "identifier field is read-only");
            return None;
        }
        if self.column(field_id).is_none() {
            return None;
        }
        let position = self.position(row_id)?;
        let original = self
            .original
            .get(position)
            .and_then(|row| row.get(field_id))
            .cloned()
            .unwrap_or(Value::Null);
        let row = self.working.get_mut(position)?;

        let key = CellKey::new(row_id, field_id);
        if value == original {
            if self.dirty.remove(&key) {
                if let Some(count) = self.dirty_per_row.get_mut(row_id) {
                    *count -= 1;
                    if *count == 0 {
                        self.dirty_per_row.remove(row_id);
                    }
                }
            }
        } else if self.dirty.insert(key) {
            *self.dirty_per_row.entry(row_id.to_string()).or_insert(0) += 1;
        }

        let previous = row.fields.insert(field_id.to_string(), value);
        Some(previous.unwrap_or(Value::Null))
    }

    pub fn reset_to_original(&mut self) {
        self.working = self.original.clone();
        self.index = self
            .working
            .iter()
            .enumerate()
            .map(|(position, row)| (row.id.clone(), position))
            .collect();
        self.dirty.clear();
        self.dirty_per_row.clear();
    }

    pub fn is_dirty(&self, row_id: &str, field_id: &str) -> bool {
        self.dirty.contains(&CellKey::new(row_id, field_id))
    }

    pub fn is_row_dirty(&self, row_id: &str) -> bool {
        self.dirty_per_row.contains_key(row_id)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Every working row with at least one dirty cell, once each, in row order.
    pub fn modified_rows(&self) -> Vec<Row> {
        let positions: BTreeSet<usize> = self
            .dirty
            .iter()
            .filter_map(|key| self.position(&key.row_id))
            .collect();
        positions
            .into_iter()
            .filter_map(|position| self.working.get(position).cloned())
            .collect()
    }

    /// Dirty cells ordered by row position, then column position.
    pub fn dirty_keys(&self) -> Vec<CellKey> {
        let column_rank = |field_id: &str| {
            self.columns
                .iter()
                .position(|c| c.field_id == field_id)
                .unwrap_or(usize::MAX)
        };
        let mut keys: Vec<&CellKey> = self.dirty.iter().collect();
        keys.sort_by_key(|key| {
            (
                self.position(&key.row_id).unwrap_or(usize::MAX),
                column_rank(&key.field_id),
            )
        });
        keys.into_iter().cloned().collect()
    }
}
