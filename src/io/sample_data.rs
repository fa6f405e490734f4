//! Deterministic demo dataset covering every column type.

use serde_json::{json, Value};

use crate::state::data_model::{ColumnSpec, DataType, Dataset};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Frances",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson", "Allen",
];
const STAGES: &[&str] = &["Prospecting", "Qualification", "Negotiation", "Closed Won"];

pub fn columns() -> Vec<ColumnSpec> {
    let column = |field_id: &str, label: &str, data_type: DataType, values: Option<&str>| {
        ColumnSpec {
            object_id: "Opportunity".to_string(),
            field_id: field_id.to_string(),
            label: label.to_string(),
            data_type,
            values: values.map(str::to_string),
        }
    };

    vec![
        column("Name", "Name", DataType::Text, None),
        column("Amount", "Amount", DataType::Number, None),
        column(
            "StageName",
            "Stage",
            DataType::Picklist,
            Some("'Prospecting','Qualification','Negotiation','Closed Won'"),
        ),
        column("CloseDate", "Close Date", DataType::Date, None),
        column("IsPriority", "Priority", DataType::Boolean, None),
    ]
}

pub fn generate(row_count: usize) -> Dataset {
    let rows = (0..row_count).map(sample_row).collect();
    Dataset {
        columns: columns(),
        rows,
    }
}

fn sample_row(index: usize) -> Value {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let month = index % 12 + 1;
    let day = index % 28 + 1;

    json!({
        "id": format!("row-{:04}", index + 1),
        "Name": format!("{first} {last}"),
        "Amount": ((index * 7_919) % 100_000) as u64,
        "StageName": STAGES[index % STAGES.len()],
        "CloseDate": format!("2025-{month:02}-{day:02}"),
        "IsPriority": index % 5 == 0,
    })
}
