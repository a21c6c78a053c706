use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::state::session::SessionController;
use crate::ui::actions;
use crate::ui::detail_panel::DetailPanel;
use crate::ui::summary_table::SummaryTable;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

#[component]
pub fn App() -> Element {
    let (initial_config, config_error) = use_hook(|| match AppConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e.to_string())),
    });

    let config = use_signal(|| initial_config.clone());
    let session = use_signal(|| SessionController::new(initial_config.schema.clone()));
    let file_path = use_signal::<Option<PathBuf>>(|| None);
    let error_message = use_signal::<Option<String>>(|| config_error.clone());
    let save_success = use_signal(|| false);

    use_effect(move || {
        let open = config.peek().open.clone();
        if let Some(path) = open {
            actions::load_path(session, file_path, error_message, path);
        }
    });

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            Toolbar { session, config, file_path, error_message, save_success }
            div { class: "panels",
                div { class: "panel left-panel",
                    SummaryTable { session, error_message }
                }
                div { class: "panel right-panel",
                    DetailPanel { session, error_message }
                }
            }
        }
    }
}
