use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use gridscope::state::bulk_edit::HeaderEditOutcome;
use gridscope::state::data_model::DraftValue;
use gridscope::state::events::GridEvent;
use gridscope::state::navigation::{CellRef, Direction};
use gridscope::state::{GridState, LoadError};

fn dataset() -> Value {
    json!({
        "columns": [
            { "objectId": "Account", "fieldId": "name", "label": "Name", "dataType": "text", "values": null },
            { "objectId": "Account", "fieldId": "score", "label": "Score", "dataType": "number", "values": null },
            { "objectId": "Account", "fieldId": "tier", "label": "Tier", "dataType": "picklist", "values": "'Gold','Silver'" },
            { "objectId": "Account", "fieldId": "since", "label": "Since", "dataType": "date", "values": null },
            { "objectId": "Account", "fieldId": "active", "label": "Active", "dataType": "boolean", "values": null }
        ],
        "rows": [
            { "id": "A", "name": "Alice", "score": 10, "tier": "Gold", "since": "2021-03-04", "active": true },
            { "id": "B", "name": "Bob", "score": 20, "tier": "Silver", "since": "2022-07-01", "active": false },
            { "id": "C", "name": "Carol", "score": 30, "tier": "Gold", "since": "2023-11-30", "active": true }
        ]
    })
}

fn sample_state() -> GridState {
    let mut state = GridState::default();
    state.load_value(dataset()).unwrap();
    state.take_events();
    state
}

fn value_of(state: &GridState, row_id: &str, field_id: &str) -> Value {
    state
        .row(row_id)
        .and_then(|row| row.get(field_id))
        .cloned()
        .unwrap_or(Value::Null)
}

fn header_edit(state: &mut GridState, field_id: &str, draft: DraftValue) -> HeaderEditOutcome {
    assert!(state.begin_header_edit(field_id));
    assert!(state.set_header_draft(draft));
    state.confirm_header_edit()
}

#[test]
fn test_load_installs_rows_in_order() {
    let state = sample_state();
    assert_eq!(state.row_count(), 3);
    assert_eq!(state.visible_row_ids(), vec!["A", "B", "C"]);
    assert_eq!(state.columns()[2].options.len(), 2);
    assert_eq!(state.working_data(), state.original_data());
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let mut state = sample_state();
    state.set_cell_from_input("A", "name", "Zed");

    let err = state
        .load_value(json!({ "columns": [], "rows": [{ "name": "no id" }] }))
        .unwrap_err();
    assert_eq!(err, LoadError::MissingIdentifier { index: 0 });

    assert_eq!(state.row_count(), 3);
    assert_eq!(value_of(&state, "A", "name"), json!("Zed"));
    assert_eq!(state.edited_cell_keys(), vec!["A_name"]);
}

#[test]
fn test_load_rejects_malformed_documents() {
    let mut state = GridState::default();
    let err = state.load_value(json!({ "columns": "nope" })).unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));

    let err = state
        .load_value(json!({ "columns": [], "rows": [{ "id": "A" }, { "id": "A" }] }))
        .unwrap_err();
    assert_eq!(err, LoadError::DuplicateIdentifier("A".to_string()));
}

#[test]
fn test_reset_restores_original_for_any_edit_sequence() {
    let mut state = sample_state();
    state.set_cell_from_input("A", "name", "Zed");
    state.set_cell_from_input("B", "score", "99");
    header_edit(&mut state, "tier", DraftValue::Text("Silver".to_string()));
    state.select_row("C");
    state.hide_selected();
    state.set_search_now("zed");

    state.reset_to_original();

    assert_eq!(state.working_data(), state.original_data());
    assert!(state.edited_cell_keys().is_empty());
    assert!(state.modified_rows().is_empty());
    assert!(state.selected_row_ids().is_empty());
    assert_eq!(state.hidden_count(), 0);
    assert_eq!(state.search_term(), "");
    assert_eq!(state.visible_row_ids(), vec!["A", "B", "C"]);
}

#[test]
fn test_bulk_edit_only_touches_selected_visible_rows() {
    let mut state = sample_state();
    state.select_row("C");
    state.hide_selected();
    state.select_row("A");

    let outcome = header_edit(&mut state, "name", DraftValue::Text("v".to_string()));

    let HeaderEditOutcome::Applied(changes) = outcome else {
        panic!("expected header edit to apply");
    };
    assert_eq!(changes.len(), 1);
    assert_eq!(value_of(&state, "A", "name"), json!("v"));
    assert_eq!(value_of(&state, "B", "name"), json!("Bob"));
    assert_eq!(value_of(&state, "C", "name"), json!("Carol"));
}

#[test]
fn test_bulk_edit_without_selection_covers_all_visible_rows() {
    let mut state = sample_state();
    state.hide_rows(&["C"]);

    header_edit(&mut state, "name", DraftValue::Text("v".to_string()));

    assert_eq!(value_of(&state, "A", "name"), json!("v"));
    assert_eq!(value_of(&state, "B", "name"), json!("v"));
    assert_eq!(value_of(&state, "C", "name"), json!("Carol"));
}

#[test]
fn test_bulk_edit_respects_search_filter() {
    let mut state = sample_state();
    state.set_search_now("gold");

    header_edit(&mut state, "score", DraftValue::Text("1".to_string()));

    assert_eq!(value_of(&state, "A", "score"), json!(1));
    assert_eq!(value_of(&state, "B", "score"), json!(20));
    assert_eq!(value_of(&state, "C", "score"), json!(1));
}

#[test]
fn test_bulk_edit_number_falls_back_to_zero_and_emits_per_row() {
    let mut state = sample_state();

    header_edit(&mut state, "score", DraftValue::Text("lots".to_string()));

    let events = state.take_events();
    let touched: Vec<(String, Value, Value)> = events
        .into_iter()
        .filter_map(|event| match event {
            GridEvent::CellChanged {
                row_id,
                old_value,
                new_value,
                ..
            } => Some((row_id, old_value, new_value)),
            GridEvent::SelectionChanged { .. } => None,
        })
        .collect();
    assert_eq!(
        touched,
        vec![
            ("A".to_string(), json!(10), json!(0)),
            ("B".to_string(), json!(20), json!(0)),
            ("C".to_string(), json!(30), json!(0)),
        ]
    );
}

#[test]
fn test_header_edit_boolean_starts_false() {
    let mut state = sample_state();
    assert!(state.begin_header_edit("active"));
    assert_eq!(state.header_edit().draft(), Some(&DraftValue::Flag(false)));

    state.confirm_header_edit();
    assert_eq!(value_of(&state, "A", "active"), json!(false));
    assert_eq!(value_of(&state, "C", "active"), json!(false));
    assert!(!state.header_edit().is_editing());
}

#[test]
fn test_header_edit_cancel_and_unknown_field() {
    let mut state = sample_state();
    assert!(!state.begin_header_edit("missing"));
    assert_eq!(state.confirm_header_edit(), HeaderEditOutcome::Cancelled);

    assert!(state.begin_header_edit("name"));
    state.set_header_draft(DraftValue::Text("gone".to_string()));
    assert!(state.cancel_header_edit());
    assert_eq!(state.confirm_header_edit(), HeaderEditOutcome::Cancelled);
    assert_eq!(value_of(&state, "A", "name"), json!("Alice"));
    assert!(state.take_events().is_empty());
}

#[test]
fn test_hidden_rows_never_surface_in_search() {
    let mut state = sample_state();
    state.hide_rows(&["B"]);

    for term in ["bob", "b", "silver", "20", "jul", ""] {
        state.set_search_now(term);
        assert!(
            !state.visible_row_ids().contains(&"B".to_string()),
            "hidden row surfaced for term {term:?}"
        );
    }
}

#[test]
fn test_search_matches_formatted_values() {
    let mut state = sample_state();

    state.set_search_now("MAR 4");
    assert_eq!(state.visible_row_ids(), vec!["A"]);

    state.set_search_now("silver");
    assert_eq!(state.visible_row_ids(), vec!["B"]);

    state.set_search_now("30");
    assert_eq!(state.visible_row_ids(), vec!["C"]);

    state.set_search_now("true");
    assert!(state.visible_row_ids().is_empty());
}

#[test]
fn test_selection_round_trip_through_hide_and_unhide() {
    let mut state = sample_state();
    state.select_row("A");
    assert_eq!(state.hide_selected(), 1);
    assert!(state.is_hidden("A"));
    assert!(state.is_selected("A"));

    state.set_search_now("bob");
    assert_eq!(state.unhide_all(), 1);

    assert!(!state.is_hidden("A"));
    assert_eq!(state.selected_row_ids(), vec!["A"]);
    assert_eq!(state.search_term(), "");
    assert_eq!(state.visible_row_ids(), vec!["A", "B", "C"]);
}

#[test]
fn test_unhide_restores_selection_cleared_while_hidden() {
    let mut state = sample_state();
    state.select_row("B");
    state.hide_selected();
    state.deselect_all();
    state.take_events();

    state.unhide_all();

    assert_eq!(state.selected_row_ids(), vec!["B"]);
    assert_eq!(
        state.take_events(),
        vec![GridEvent::SelectionChanged {
            selected_ids: vec!["B".to_string()]
        }]
    );
}

#[test]
fn test_select_all_state_tracks_visible_rows() {
    let mut state = sample_state();
    assert!(!state.select_all_state().checked);
    assert!(!state.select_all_state().indeterminate);

    state.select_row("A");
    assert!(state.select_all_state().indeterminate);

    state.toggle_select_all();
    assert!(state.select_all_state().checked);
    assert_eq!(state.selected_row_ids(), vec!["A", "B", "C"]);

    state.set_search_now("alice");
    assert!(state.select_all_state().checked);

    state.toggle_select_all();
    assert!(state.selected_row_ids().is_empty());
}

#[test]
fn test_select_all_only_adds_visible_rows() {
    let mut state = sample_state();
    state.hide_rows(&["C"]);
    state.select_all_visible();
    assert_eq!(state.selected_row_ids(), vec!["A", "B"]);
}

#[test]
fn test_edit_ledger_after_reset() {
    let mut state = sample_state();
    state.set_cell_from_input("A", "name", "x");
    state.set_cell_from_input("A", "score", "5");
    state.reset_to_original();
    state.set_cell_from_input("A", "name", "y");

    assert_eq!(state.edited_cell_keys(), vec!["A_name"]);
    assert_eq!(state.modified_rows().len(), 1);
    assert_eq!(state.modified_rows()[0].id, "A");
}

#[test]
fn test_single_cell_edit_emits_change() {
    let mut state = sample_state();
    assert!(state.set_cell_from_input("B", "score", "21.5"));

    assert_eq!(
        state.take_events(),
        vec![GridEvent::CellChanged {
            row_id: "B".to_string(),
            field_id: "score".to_string(),
            old_value: json!(20),
            new_value: json!(21.5),
        }]
    );
    assert!(state.is_cell_dirty("B", "score"));
    assert!(state.is_row_dirty("B"));
}

#[test]
fn test_unknown_cells_are_silent_no_ops() {
    let mut state = sample_state();
    assert!(!state.set_cell_from_input("Z", "name", "x"));
    assert!(!state.set_cell_from_input("A", "nope", "x"));
    assert!(!state.select_row("Z"));
    assert_eq!(state.hide_rows(&["Z"]), 0);
    assert!(state.take_events().is_empty());
    assert!(state.edited_cell_keys().is_empty());
}

#[test]
fn test_selection_events_once_per_action() {
    let mut state = sample_state();
    state.select_row("A");
    state.select_row("A");
    state.toggle_select_all();

    let events = state.take_events();
    assert_eq!(
        events,
        vec![
            GridEvent::SelectionChanged {
                selected_ids: vec!["A".to_string()]
            },
            GridEvent::SelectionChanged {
                selected_ids: vec!["A".to_string(), "B".to_string(), "C".to_string()]
            },
        ]
    );
}

#[test]
fn test_debounced_search_commits_only_latest_term() {
    let mut state = sample_state();
    let first = state.queue_search("car");
    let second = state.queue_search("bob");

    assert_eq!(state.pending_search(), Some("bob"));
    assert!(!state.commit_search(first));
    assert_eq!(state.search_term(), "");

    assert!(state.commit_search(second));
    assert_eq!(state.search_term(), "bob");
    assert_eq!(state.visible_row_ids(), vec!["B"]);
    assert_eq!(state.pending_search(), None);
}

#[test]
fn test_reset_cancels_pending_search() {
    let mut state = sample_state();
    let handle = state.queue_search("bob");
    state.reset_to_original();
    assert!(!state.commit_search(handle));
    assert_eq!(state.visible_row_ids().len(), 3);
}

#[test]
fn test_unhide_all_cancels_pending_search() {
    let mut state = sample_state();
    state.hide_rows(&["C"]);
    let handle = state.queue_search("bob");

    assert_eq!(state.unhide_all(), 1);
    assert_eq!(state.pending_search(), None);
    assert!(!state.commit_search(handle));
    assert_eq!(state.search_term(), "");
    assert_eq!(state.visible_row_ids(), vec!["A", "B", "C"]);
}

#[test]
fn test_window_rewinds_are_counted() {
    let mut state = sample_state();
    let after_load = state.scroll_rewinds();

    state.scroll_to(640.0, 320.0);
    state.set_cell_from_input("A", "name", "Zed");
    state.hide_rows(&["B"]);
    assert_eq!(state.scroll_rewinds(), after_load);

    let handle = state.queue_search("zed");
    assert!(state.commit_search(handle));
    assert_eq!(state.scroll_rewinds(), after_load + 1);

    state.unhide_all();
    assert_eq!(state.scroll_rewinds(), after_load + 2);

    state.reset_to_original();
    assert_eq!(state.scroll_rewinds(), after_load + 3);
}

#[test]
fn test_neighbor_cell_follows_display_order() {
    let mut state = sample_state();
    state.hide_rows(&["B"]);

    assert_eq!(
        state.neighbor_cell("A", "name", Direction::Down),
        Some(CellRef::new("C", "name"))
    );
    assert_eq!(state.neighbor_cell("A", "name", Direction::Up), None);
    assert_eq!(state.neighbor_cell("B", "name", Direction::Down), None);
}
