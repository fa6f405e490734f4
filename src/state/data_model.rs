use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub type Fields = BTreeMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Picklist,
    Date,
    Boolean,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
}

/// Column metadata as installed in the grid. Immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub object_id: String,
    pub field_id: String,
    pub label: String,
    pub data_type: DataType,
    #[serde(default)]
    pub options: Vec<PicklistOption>,
}

/// Column metadata in the inbound dataset shape, with picklist values still
/// packed as a quoted list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(default)]
    pub object_id: String,
    pub field_id: String,
    #[serde(default)]
    pub label: String,
    pub data_type: DataType,
    #[serde(default)]
    pub values: Option<String>,
}

/// A dataset as handed over by the loading collaborator. Rows are kept as raw
/// JSON so that identifier problems are reported by the grid, not by serde.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// A working or original row. `fields` keeps every key of the inbound object,
/// the identifier field included, so it serializes back to the same shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Value held by an in-progress edit before it is converted to the column's type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftValue {
    Text(String),
    Flag(bool),
}

impl DraftValue {
    pub fn zero_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => DraftValue::Flag(false),
            DataType::Text | DataType::Number | DataType::Picklist | DataType::Date => {
                DraftValue::Text(String::new())
            }
        }
    }
}

impl ColumnSpec {
    pub fn into_column(self) -> Column {
        let options = match (self.data_type, self.values.as_deref()) {
            (DataType::Picklist, Some(raw)) => parse_picklist_values(raw),
            _ => Vec::new(),
        };
        let label = if self.label.trim().is_empty() {
            self.field_id.clone()
        } else {
            self.label
        };

        Column {
            object_id: self.object_id,
            field_id: self.field_id,
            label,
            data_type: self.data_type,
            options,
        }
    }
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, field_id: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field_id.into(), value);
        self
    }

    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.fields.get(field_id)
    }
}

impl Column {
    /// Formats a cell value the way the grid shows it.
    pub fn display_value(&self, value: Option<&Value>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        if value.is_null() {
            return String::new();
        }

        match self.data_type {
            DataType::Text => display_value(value),
            DataType::Number => value_as_f64(value)
                .map(format_number)
                .unwrap_or_else(|| display_value(value)),
            DataType::Picklist => {
                let raw = display_value(value);
                self.options
                    .iter()
                    .find(|option| option.value == raw)
                    .map(|option| option.label.clone())
                    .unwrap_or(raw)
            }
            DataType::Date => {
                let raw = display_value(value);
                parse_date(&raw)
                    .map(|date| date.format("%b %-d, %Y").to_string())
                    .unwrap_or(raw)
            }
            DataType::Boolean => match value {
                Value::Bool(b) => b.to_string(),
                other => parse_bool(&display_value(other))
                    .map(|b| b.to_string())
                    .unwrap_or_default(),
            },
        }
    }

    /// Case-folded text a search term is matched against. Checkbox columns carry
    /// no searchable text.
    pub fn search_text(&self, value: Option<&Value>) -> Option<String> {
        match self.data_type {
            DataType::Boolean => None,
            DataType::Text | DataType::Number | DataType::Picklist | DataType::Date => {
                Some(self.display_value(value).to_lowercase())
            }
        }
    }

    /// Converts an edit draft to the column's semantic type. Never fails: numbers
    /// that do not parse become `0`.
    pub fn coerce_draft(&self, draft: &DraftValue) -> Value {
        match (self.data_type, draft) {
            (DataType::Number, DraftValue::Text(raw)) => {
                Value::Number(parse_number(raw).unwrap_or_else(|| 0.into()))
            }
            (DataType::Number, DraftValue::Flag(flag)) => Value::Number(u8::from(*flag).into()),
            (DataType::Boolean, DraftValue::Text(raw)) => {
                Value::Bool(parse_bool(raw).unwrap_or(false))
            }
            (DataType::Boolean, DraftValue::Flag(flag)) => Value::Bool(*flag),
            (DataType::Text | DataType::Picklist | DataType::Date, DraftValue::Text(raw)) => {
                Value::String(raw.clone())
            }
            (DataType::Text | DataType::Picklist | DataType::Date, DraftValue::Flag(flag)) => {
                Value::String(flag.to_string())
            }
        }
    }

    pub fn coerce_input(&self, raw: &str) -> Value {
        self.coerce_draft(&DraftValue::Text(raw.to_string()))
    }

    /// Raw text placed in an input control for this cell.
    pub fn input_value(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(value) => display_value(value),
        }
    }
}

/// Parses `'a','b'` style picklist literals into ordered options.
pub fn parse_picklist_values(raw: &str) -> Vec<PicklistOption> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    let mut flush = |current: &mut String, quoted: bool| {
        let item = if quoted {
            current.clone()
        } else {
            current.trim().to_string()
        };
        if !item.is_empty() {
            out.push(PicklistOption {
                label: item.clone(),
                value: item,
            });
        }
        current.clear();
    };

    for ch in raw.chars() {
        match ch {
            '\'' => {
                in_quotes = !in_quotes;
                if in_quotes {
                    current.clear();
                    quoted = true;
                }
            }
            ',' if !in_quotes => {
                flush(&mut current, quoted);
                quoted = false;
            }
            _ if in_quotes => current.push(ch),
            _ if quoted => {} // stray text after a closing quote
            _ => current.push(ch),
        }
    }
    flush(&mut current, quoted);
    out
}

/// Formats a JSON value as plain text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let mut out = format!("{value:.6}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(i.into());
    }
    let f = trimmed.parse::<f64>().ok()?;
    json_number_from_f64(f)
}

fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        Some(false)
    } else {
        None
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn json_number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        return Some((value as i64).into());
    }
    Number::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data_type: DataType) -> Column {
        Column {
            object_id: "Account".to_string(),
            field_id: "f".to_string(),
            label: "F".to_string(),
            data_type,
            options: Vec::new(),
        }
    }

    #[test]
    fn picklist_values_keep_order_and_commas_inside_quotes() {
        let options = parse_picklist_values("'Hot', 'Warm, mostly','Cold'");
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Hot", "Warm, mostly", "Cold"]);
        assert!(options.iter().all(|o| o.label == o.value));
    }

    #[test]
    fn picklist_values_tolerate_unquoted_items() {
        let options = parse_picklist_values("a, b ,,c");
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn number_draft_falls_back_to_zero() {
        let col = column(DataType::Number);
        assert_eq!(col.coerce_input("abc"), Value::Number(0.into()));
        assert_eq!(col.coerce_input(""), Value::Number(0.into()));
        assert_eq!(col.coerce_input(" 42 "), Value::Number(42.into()));
        assert_eq!(col.coerce_input("2.5"), serde_json::json!(2.5));
    }

    #[test]
    fn boolean_zero_draft_is_false() {
        assert_eq!(DraftValue::zero_for(DataType::Boolean), DraftValue::Flag(false));
        assert_eq!(
            DraftValue::zero_for(DataType::Date),
            DraftValue::Text(String::new())
        );
    }

    #[test]
    fn date_display_is_human_readable() {
        let col = column(DataType::Date);
        let value = Value::String("2024-01-05".to_string());
        assert_eq!(col.display_value(Some(&value)), "Jan 5, 2024");

        let garbage = Value::String("soon".to_string());
        assert_eq!(col.display_value(Some(&garbage)), "soon");
    }

    #[test]
    fn number_display_trims_trailing_zeros() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.50), "2.5");
        assert_eq!(format_number(f64::NAN), "");
    }

    #[test]
    fn boolean_columns_are_not_searchable() {
        let col = column(DataType::Boolean);
        assert_eq!(col.search_text(Some(&Value::Bool(true))), None);
    }
}
