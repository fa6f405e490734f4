use dioxus::prelude::{Key, *};
use std::rc::Rc;

use crate::state::bulk_edit::HeaderEdit;
use crate::state::data_model::{Column, DataType, DraftValue, Row};
use crate::state::navigation::Direction;
use crate::state::GridState;
use crate::ui::actions;

#[derive(Clone, PartialEq)]
struct EditingCell {
    row_id: String,
    field_id: String,
    draft: String,
}

#[component]
pub fn Table(data: Signal<GridState>) -> Element {
    let editing = use_signal::<Option<EditingCell>>(|| None);
    let mut container = use_signal::<Option<Rc<MountedData>>>(|| None);
    let mut table_top = use_signal::<Option<Rc<MountedData>>>(|| None);
    let mut seen_rewinds = use_signal(|| 0u64);

    // Follow the engine when it moves the window back to the first row.
    use_effect(move || {
        let rewinds = data.read().scroll_rewinds();
        if rewinds == *seen_rewinds.peek() {
            return;
        }
        seen_rewinds.set(rewinds);
        let Some(top) = table_top.peek().clone() else {
            return;
        };
        spawn(async move {
            if top.scroll_to(ScrollBehavior::Instant).await.is_err() {
                tracing::debug!("could not rewind table scroll position");
            }
        });
    });

    let state = data.read();
    let columns = state.columns().to_vec();
    let select_all = state.select_all_state();
    let header_edit = state.header_edit().clone();
    let (pad_top, pad_bottom) = state.window_padding();
    let row_height = state.config().row_height;
    let rows: Vec<(usize, Row, bool, Vec<String>)> = state
        .window_rows()
        .into_iter()
        .map(|(index, row)| {
            let dirty_fields = columns
                .iter()
                .filter(|col| state.is_cell_dirty(&row.id, &col.field_id))
                .map(|col| col.field_id.clone())
                .collect();
            (index, row.clone(), state.is_selected(&row.id), dirty_fields)
        })
        .collect();
    drop(state);

    if columns.is_empty() {
        return rsx! {
            p { class: "empty-message", id: "empty-message", "No data loaded. Click \"Open\" to load a dataset." }
        };
    }

    let select_all_class = if select_all.indeterminate {
        "select-all indeterminate"
    } else {
        "select-all"
    };

    rsx! {
        div {
            class: "table-container",
            id: "table-container",
            onmounted: move |evt| container.set(Some(evt.data())),
            onscroll: move |_| {
                let mounted = container.read().clone();
                spawn(async move {
                    let Some(mounted) = mounted else {
                        return;
                    };
                    let (Ok(offset), Ok(rect)) =
                        (mounted.get_scroll_offset().await, mounted.get_client_rect().await)
                    else {
                        return;
                    };
                    let mut data = data;
                    data.with_mut(|state| state.scroll_to(offset.y, rect.size.height));
                });
            },
            table {
                onmounted: move |evt| table_top.set(Some(evt.data())),
                thead {
                    tr {
                        th { class: "row-select",
                            input {
                                class: "{select_all_class}",
                                id: "select-all",
                                r#type: "checkbox",
                                checked: select_all.checked,
                                "data-indeterminate": "{select_all.indeterminate}",
                                onclick: move |_| {
                                    let mut data = data;
                                    data.with_mut(|state| state.toggle_select_all());
                                    actions::publish_events(data);
                                }
                            }
                        }
                        for col in &columns {
                            HeaderCell { column: col.clone(), header_edit: header_edit.clone(), data }
                        }
                    }
                }
                tbody {
                    if pad_top > 0.0 {
                        tr { class: "spacer", style: "height: {pad_top}px;" }
                    }
                    for (display_index, row, is_selected, dirty_fields) in rows {
                        TableRow {
                            key: "{row.id}",
                            display_index,
                            row: row.clone(),
                            columns: columns.clone(),
                            dirty_fields: dirty_fields.clone(),
                            is_selected,
                            row_height,
                            data,
                            editing,
                        }
                    }
                    if pad_bottom > 0.0 {
                        tr { class: "spacer", style: "height: {pad_bottom}px;" }
                    }
                }
            }
        }
    }
}

#[component]
fn HeaderCell(column: Column, header_edit: HeaderEdit, data: Signal<GridState>) -> Element {
    let field_id = column.field_id.clone();
    let header_id = format!("col-{}", sanitize_id(&field_id));
    let is_editing = header_edit.field_id() == Some(field_id.as_str());

    if !is_editing {
        return rsx! {
            th { class: "header", id: "{header_id}",
                span { class: "header-label", "{column.label}" }
                button {
                    class: "header-edit-btn",
                    title: "Set value for all rows in scope",
                    onclick: move |_| {
                        let mut data = data;
                        data.with_mut(|state| state.begin_header_edit(&field_id));
                    },
                    "\u{270E}"
                }
            }
        };
    }

    let draft = header_edit.draft().cloned();
    rsx! {
        th { class: "header header-editing", id: "{header_id}",
            span { class: "header-label", "{column.label}" }
            DraftEditor { column: column.clone(), draft, data }
            button {
                class: "header-apply-btn",
                onclick: move |_| apply_header_edit(data),
                "\u{2714}"
            }
            button {
                class: "header-cancel-btn",
                onclick: move |_| {
                    let mut data = data;
                    data.with_mut(|state| state.cancel_header_edit());
                },
                "\u{2715}"
            }
        }
    }
}

#[component]
fn DraftEditor(column: Column, draft: Option<DraftValue>, data: Signal<GridState>) -> Element {
    let text = match &draft {
        Some(DraftValue::Text(text)) => text.clone(),
        Some(DraftValue::Flag(_)) | None => String::new(),
    };
    let set_text = move |value: String| {
        let mut data = data;
        data.with_mut(|state| state.set_header_draft(DraftValue::Text(value)));
    };
    let on_key = move |evt: Event<KeyboardData>| match evt.key() {
        Key::Enter => apply_header_edit(data),
        Key::Escape => {
            let mut data = data;
            data.with_mut(|state| state.cancel_header_edit());
        }
        _ => {}
    };

    match column.data_type {
        DataType::Boolean => {
            let flag = matches!(draft, Some(DraftValue::Flag(true)));
            rsx! {
                input {
                    class: "header-draft",
                    r#type: "checkbox",
                    checked: flag,
                    onclick: move |_| {
                        let mut data = data;
                        data.with_mut(|state| state.set_header_draft(DraftValue::Flag(!flag)));
                    },
                    onkeydown: on_key,
                }
            }
        }
        DataType::Picklist => rsx! {
            select {
                class: "header-draft",
                value: "{text}",
                onchange: move |evt| set_text(evt.value()),
                onkeydown: on_key,
                option { value: "", "--" }
                for choice in column.options.iter() {
                    option { value: "{choice.value}", "{choice.label}" }
                }
            }
        },
        DataType::Text | DataType::Number | DataType::Date => rsx! {
            input {
                class: "header-draft",
                r#type: input_type(column.data_type),
                value: "{text}",
                autofocus: true,
                oninput: move |evt| set_text(evt.value()),
                onkeydown: on_key,
            }
        },
    }
}

#[component]
fn TableRow(
    display_index: usize,
    row: Row,
    columns: Vec<Column>,
    dirty_fields: Vec<String>,
    is_selected: bool,
    row_height: f64,
    data: Signal<GridState>,
    editing: Signal<Option<EditingCell>>,
) -> Element {
    let mut row_class = if display_index % 2 == 0 {
        "even"
    } else {
        "odd"
    }
    .to_string();
    if is_selected {
        row_class.push_str(" selected-row");
    }
    if !dirty_fields.is_empty() {
        row_class.push_str(" dirty-row");
    }
    let row_id = row.id.clone();
    let row_dom_id = format!("row-{}", sanitize_id(&row.id));

    rsx! {
        tr { class: "{row_class}", id: "{row_dom_id}", style: "height: {row_height}px;",
            td { class: "row-select",
                input {
                    r#type: "checkbox",
                    checked: is_selected,
                    onclick: move |_| {
                        let mut data = data;
                        data.with_mut(|state| state.toggle_row(&row_id));
                        actions::publish_events(data);
                    }
                }
            }
            for col in &columns {
                TableCell {
                    row: row.clone(),
                    column: col.clone(),
                    is_dirty: dirty_fields.contains(&col.field_id),
                    data,
                    editing,
                }
            }
        }
    }
}

#[component]
fn TableCell(
    row: Row,
    column: Column,
    is_dirty: bool,
    data: Signal<GridState>,
    editing: Signal<Option<EditingCell>>,
) -> Element {
    let row_id = row.id.clone();
    let field_id = column.field_id.clone();
    let value = row.get(&field_id).cloned();
    let cell_class = if is_dirty { "cell dirty-cell" } else { "cell" };
    let cell_id = format!("cell-{}-{}", sanitize_id(&row_id), sanitize_id(&field_id));

    if column.data_type == DataType::Boolean {
        let checked = matches!(value, Some(serde_json::Value::Bool(true)));
        return rsx! {
            td { class: "{cell_class}", id: "{cell_id}",
                input {
                    r#type: "checkbox",
                    checked: checked,
                    onclick: move |_| {
                        let mut data = data;
                        data.with_mut(|state| {
                            state.set_cell_from_draft(&row_id, &field_id, &DraftValue::Flag(!checked))
                        });
                        actions::publish_events(data);
                    }
                }
            }
        };
    }

    let active = editing
        .read()
        .as_ref()
        .filter(|cell| cell.row_id == row_id && cell.field_id == field_id)
        .map(|cell| cell.draft.clone());

    let Some(draft) = active else {
        let display = column.display_value(value.as_ref());
        let raw = column.input_value(value.as_ref());
        return rsx! {
            td {
                class: "{cell_class}",
                id: "{cell_id}",
                onclick: move |_| {
                    let mut editing = editing;
                    editing.set(Some(EditingCell {
                        row_id: row_id.clone(),
                        field_id: field_id.clone(),
                        draft: raw.clone(),
                    }));
                },
                "{display}"
            }
        };
    };

    let on_key = {
        let row_id = row_id.clone();
        let field_id = field_id.clone();
        move |evt: Event<KeyboardData>| {
            let direction = match evt.key() {
                Key::Enter => return commit_edit(data, editing, None),
                Key::Escape => {
                    let mut editing = editing;
                    editing.set(None);
                    return;
                }
                Key::ArrowUp => Direction::Up,
                Key::ArrowDown => Direction::Down,
                _ => return,
            };
            evt.prevent_default();
            let target = (row_id.clone(), field_id.clone(), direction);
            commit_edit(data, editing, Some(target));
        }
    };
    let on_input = move |evt: Event<FormData>| {
        let value = evt.value();
        let mut editing = editing;
        editing.with_mut(|cell| {
            if let Some(cell) = cell {
                cell.draft = value;
            }
        });
    };

    if column.data_type == DataType::Picklist {
        return rsx! {
            td { class: "editing-cell",
                select {
                    class: "cell-input",
                    id: "{cell_id}-input",
                    value: "{draft}",
                    autofocus: true,
                    onchange: move |evt| {
                        on_input(evt);
                        commit_edit(data, editing, None);
                    },
                    onblur: {
                        let row_id = row_id.clone();
                        let field_id = field_id.clone();
                        move |_| commit_if_active(data, editing, &row_id, &field_id)
                    },
                    onkeydown: on_key,
                    for choice in column.options.iter() {
                        option { value: "{choice.value}", "{choice.label}" }
                    }
                }
            }
        };
    }

    rsx! {
        td { class: "editing-cell",
            input {
                class: "cell-input",
                id: "{cell_id}-input",
                r#type: input_type(column.data_type),
                value: "{draft}",
                autofocus: true,
                oninput: on_input,
                onblur: {
                    let row_id = row_id.clone();
                    let field_id = field_id.clone();
                    move |_| commit_if_active(data, editing, &row_id, &field_id)
                },
                onkeydown: on_key,
            }
        }
    }
}

/// Blur handler: only the cell that still owns the editor commits.
fn commit_if_active(
    data: Signal<GridState>,
    editing: Signal<Option<EditingCell>>,
    row_id: &str,
    field_id: &str,
) {
    let active = editing
        .read()
        .as_ref()
        .map(|cell| cell.row_id == row_id && cell.field_id == field_id)
        .unwrap_or(false);
    if active {
        commit_edit(data, editing, None);
    }
}

fn apply_header_edit(mut data: Signal<GridState>) {
    data.with_mut(|state| state.confirm_header_edit());
    actions::publish_events(data);
}

/// Writes the active draft and optionally opens the neighbouring cell.
fn commit_edit(
    mut data: Signal<GridState>,
    mut editing: Signal<Option<EditingCell>>,
    then_move: Option<(String, String, Direction)>,
) {
    let edit = editing.read().as_ref().cloned();
    let Some(edit) = edit else {
        return;
    };

    let next = data.with_mut(|state| {
        let unchanged = state
            .row(&edit.row_id)
            .zip(state.column(&edit.field_id))
            .map(|(row, column)| column.input_value(row.get(&edit.field_id)) == edit.draft)
            .unwrap_or(true);
        if !unchanged {
            state.set_cell_from_input(&edit.row_id, &edit.field_id, &edit.draft);
        }

        let (row_id, field_id, direction) = then_move?;
        let target = state.neighbor_cell(&row_id, &field_id, direction)?;
        let draft = state
            .row(&target.row_id)
            .zip(state.column(&target.field_id))
            .map(|(row, column)| column.input_value(row.get(&target.field_id)))
            .unwrap_or_default();
        Some(EditingCell {
            row_id: target.row_id,
            field_id: target.field_id,
            draft,
        })
    });
    editing.set(next);
    actions::publish_events(data);
}

fn input_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Number => "number",
        DataType::Date => "date",
        DataType::Boolean => "checkbox",
        DataType::Text | DataType::Picklist => "text",
    }
}

fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}
