use dioxus::prelude::*;
use std::path::PathBuf;

use crate::state::GridState;
use crate::ui::actions;

#[component]
pub fn Toolbar(
    data: Signal<GridState>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
    search_input: Signal<String>,
) -> Element {
    let (modified, selected, hidden, visible, total) = {
        let state = data.read();
        (
            state.modified_row_count(),
            state.selected_row_ids().len(),
            state.hidden_count(),
            state.visible_rows().len(),
            state.row_count(),
        )
    };

    rsx! {
        div { class: "toolbar",
            // File group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_file(data, file_path, error_message, search_input).await;
                        });
                    },
                    "\u{1F4C2} Open"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-reset",
                    disabled: modified == 0 && hidden == 0 && selected == 0,
                    onclick: move |_| {
                        data.with_mut(|state| state.reset_to_original());
                        search_input.set(String::new());
                        error_message.set(None);
                        actions::publish_events(data);
                    },
                    "\u{21BA} Reset"
                }
            }
            div { class: "toolbar-separator" }

            // Row scoping group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-hide-selected",
                    disabled: selected == 0,
                    onclick: move |_| {
                        data.with_mut(|state| state.hide_selected());
                    },
                    "Hide Selected"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-unhide-all",
                    disabled: hidden == 0,
                    onclick: move |_| {
                        data.with_mut(|state| state.unhide_all());
                        search_input.set(String::new());
                        actions::publish_events(data);
                    },
                    "Unhide All ({hidden})"
                }
            }
            div { class: "toolbar-separator" }

            // Search group
            div { class: "toolbar-group",
                input {
                    class: "toolbar-input",
                    id: "input-search-query",
                    placeholder: "Search visible rows",
                    value: "{search_input.read()}",
                    oninput: move |evt| {
                        let term = evt.value();
                        search_input.set(term.clone());
                        actions::queue_search(data, term);
                    }
                }
            }

            // Info area (right-aligned)
            div { class: "toolbar-info",
                span { class: "toolbar-label", id: "label-counts",
                    "{visible}/{total} shown \u{00B7} {selected} selected \u{00B7} {modified} modified"
                }
                if let Some(path) = file_path.read().as_ref() {
                    span { class: "file-path", "{path.display()}" }
                }
                if let Some(err) = error_message.read().as_ref() {
                    span { class: "error-message", "{err}" }
                }
            }
        }
    }
}
