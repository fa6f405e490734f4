use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::OPEN_ENV;
use crate::io::{dataset_io, sample_data};
use crate::state::events::GridEvent;
use crate::state::GridState;

/// Opens `GRIDSCOPE_OPEN` if set, otherwise installs the demo dataset.
pub fn load_initial(
    mut data: Signal<GridState>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) {
    if let Ok(path) = std::env::var(OPEN_ENV) {
        let path = PathBuf::from(path);
        match dataset_io::load_dataset(&path) {
            Ok(dataset) => match data.with_mut(|state| state.load(dataset)) {
                Ok(()) => {
                    file_path.set(Some(path));
                    error_message.set(None);
                    return;
                }
                Err(e) => error_message.set(Some(e.to_string())),
            },
            Err(e) => error_message.set(Some(e.to_string())),
        }
    }

    let rows = data.peek().config().sample_rows;
    if let Err(e) = data.with_mut(|state| state.load(sample_data::generate(rows))) {
        error_message.set(Some(e.to_string()));
    }
}

pub async fn open_file(
    mut data: Signal<GridState>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
    mut search_input: Signal<String>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("Grid dataset", &["json"])
        .pick_file()
        .await;

    let Some(handle) = task else {
        return;
    };
    let path = handle.path().to_path_buf();
    let loaded = dataset_io::load_dataset(&path)
        .map_err(|e| e.to_string())
        .and_then(|dataset| {
            data.with_mut(|state| state.load(dataset))
                .map_err(|e| e.to_string())
        });

    match loaded {
        Ok(()) => {
            file_path.set(Some(path));
            error_message.set(None);
            search_input.set(String::new());
            publish_events(data);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open dataset");
            error_message.set(Some(e));
        }
    }
}

/// Debounces a search box change. Only the last keystroke within the delay
/// reaches the grid.
pub fn queue_search(mut data: Signal<GridState>, term: String) {
    let (handle, delay) = data.with_mut(|state| {
        let handle = state.queue_search(term);
        (handle, state.config().search_debounce())
    });

    spawn(async move {
        tokio::time::sleep(delay).await;
        data.with_mut(|state| state.commit_search(handle));
    });
}

/// Hands queued notifications to the host. The desktop shell only logs them.
pub fn publish_events(mut data: Signal<GridState>) {
    let events = data.with_mut(|state| state.take_events());
    for event in events {
        match event {
            GridEvent::CellChanged {
                row_id,
                field_id,
                old_value,
                new_value,
            } => {
                tracing::debug!(%row_id, %field_id, %old_value, %new_value, "cell changed");
            }
            GridEvent::SelectionChanged { selected_ids } => {
                tracing::debug!(selected = selected_ids.len(), "selection changed");
            }
        }
    }
}
