use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::virtual_window::{
    DEFAULT_BUFFER_ROWS, DEFAULT_ROW_HEIGHT, DEFAULT_WINDOW_THRESHOLD,
};

pub const OPEN_ENV: &str = "GRIDSCOPE_OPEN";

/// Tunables for the grid engine and the desktop shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Row field holding the unique identifier.
    pub id_field: String,
    pub row_height: f64,
    /// Rows materialized above and below the viewport.
    pub buffer_rows: usize,
    /// Visible-row count above which windowing is used.
    pub window_threshold: usize,
    pub search_debounce_ms: u64,
    /// Rows generated for the demo dataset when nothing is opened.
    pub sample_rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            row_height: DEFAULT_ROW_HEIGHT,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            window_threshold: DEFAULT_WINDOW_THRESHOLD,
            search_debounce_ms: 300,
            sample_rows: 1000,
        }
    }
}

impl GridConfig {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Defaults overlaid with `GRIDSCOPE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Values that fail to parse are skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id_field) = lookup("GRIDSCOPE_ID_FIELD").filter(|v| !v.trim().is_empty()) {
            self.id_field = id_field.trim().to_string();
        }
        override_parsed(&lookup, "GRIDSCOPE_ROW_HEIGHT", &mut self.row_height);
        override_parsed(&lookup, "GRIDSCOPE_BUFFER_ROWS", &mut self.buffer_rows);
        override_parsed(&lookup, "GRIDSCOPE_WINDOW_THRESHOLD", &mut self.window_threshold);
        override_parsed(&lookup, "GRIDSCOPE_SEARCH_DEBOUNCE_MS", &mut self.search_debounce_ms);
        override_parsed(&lookup, "GRIDSCOPE_SAMPLE_ROWS", &mut self.sample_rows);
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, "ignoring unparsable config override"),
    }
}
