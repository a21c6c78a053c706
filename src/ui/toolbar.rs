use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::state::session::{SessionController, UiEvent, ViewState};
use crate::ui::actions;

#[component]
pub fn Toolbar(
    session: Signal<SessionController>,
    config: Signal<AppConfig>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
    save_success: Signal<bool>,
) -> Element {
    let mut new_column = use_signal(String::new);
    let mut show_reset = use_signal(|| false);

    let loaded = *session.read().view() != ViewState::Initial;
    let can_add = session.read().can_add_column(&new_column.read());
    let layout_name = config.read().layout.name();

    rsx! {
        div { class: "toolbar",
            // File group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_file(session, file_path, error_message).await;
                        });
                    },
                    "\u{1F4C2} Open"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save",
                    disabled: !loaded,
                    onclick: move |_| {
                        let success = actions::save_file(session, config, error_message);
                        if success {
                            let mut save_success = save_success;
                            save_success.set(true);
                            spawn(async move {
                                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                save_success.set(false);
                            });
                        }
                    },
                    "\u{1F4BE} Save"
                }
                if *save_success.read() {
                    span { class: "save-success", id: "save-toast", "\u{2714} Scenarios have been saved!" }
                }
            }
            div { class: "toolbar-separator" }

            // Scenario group
            div { class: "toolbar-group",
                input {
                    class: "toolbar-input",
                    id: "add-scenario-name",
                    placeholder: "Scenario name",
                    disabled: !loaded,
                    value: "{new_column.read()}",
                    oninput: move |evt| {
                        new_column.set(evt.value());
                    }
                }
                button {
                    class: "toolbar-btn",
                    id: "confirm-add-scenario",
                    disabled: !can_add,
                    onclick: move |_| {
                        let name = new_column.read().trim().to_string();
                        let added = actions::dispatch(
                            session,
                            error_message,
                            UiEvent::AddColumnConfirmed { name: Some(name) },
                        );
                        if added {
                            new_column.set(String::new());
                        }
                    },
                    "\u{2795} Add Scenario"
                }
                button {
                    class: "toolbar-btn toolbar-btn-danger",
                    id: "btn-reset-table",
                    disabled: !loaded,
                    onclick: move |_| {
                        show_reset.set(true);
                    },
                    "\u{21BA} Reset Table"
                }
            }

            if *show_reset.read() {
                div { class: "modal-backdrop",
                    div { class: "modal", id: "modal-reset-table",
                        p { "All variables and values will be reset to the original table." }
                        div { class: "modal-footer",
                            button {
                                class: "toolbar-btn toolbar-btn-danger",
                                id: "confirm-reset-table",
                                onclick: move |_| {
                                    actions::dispatch(session, error_message, UiEvent::ResetConfirmed);
                                    show_reset.set(false);
                                },
                                "Confirm"
                            }
                            button {
                                class: "toolbar-btn",
                                id: "cancel-reset-table",
                                onclick: move |_| {
                                    show_reset.set(false);
                                },
                                "Cancel"
                            }
                        }
                    }
                }
            }

            // Info area (right-aligned)
            div { class: "toolbar-info",
                span { class: "toolbar-label", id: "label-layout", "{layout_name}" }
                if let Some(path) = file_path.read().as_ref() {
                    span { class: "file-path", "{path.display()}" }
                }
                if let Some(err) = error_message.read().as_ref() {
                    span { class: "error-message", id: "error-message", "{err}" }
                }
            }
        }
    }
}
