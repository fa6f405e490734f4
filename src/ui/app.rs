use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::GridConfig;
use crate::state::GridState;
use crate::ui::actions;
use crate::ui::table::Table;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

#[component]
pub fn App() -> Element {
    let data = use_signal(|| GridState::new(GridConfig::from_env()));
    let file_path = use_signal::<Option<PathBuf>>(|| None);
    let error_message = use_signal::<Option<String>>(|| None);
    let search_input = use_signal(String::new);

    use_effect(move || actions::load_initial(data, file_path, error_message));

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            Toolbar { data, file_path, error_message, search_input }
            Table { data }
        }
    }
}
