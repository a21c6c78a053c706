use dioxus::prelude::{Key, *};

use crate::state::data_model::{self, FocusMode};
use crate::state::session::{self, DetailView, SessionController, UiEvent};
use crate::ui::{actions, join_classes, sanitize_id};

#[derive(Clone, PartialEq)]
struct EditingCell {
    row_key: String,
    column: String,
    original: String,
    draft: String,
}

#[component]
pub fn DetailPanel(
    session: Signal<SessionController>,
    error_message: Signal<Option<String>>,
) -> Element {
    let editing = use_signal::<Option<EditingCell>>(|| None);
    let show_bulk = use_signal(|| false);

    let Some(detail) = session.read().detail_view() else {
        return rsx! {
            div { class: "card",
                div { class: "card-header", "Scenario Control per Time Step" }
                p { class: "empty-message", id: "detail-empty", "Select a well to edit its time steps." }
            }
        };
    };

    let schema = session.read().schema().clone();
    let id_column = schema.id.clone();
    let bulk_options: Vec<String> = match schema.focus_mode {
        FocusMode::Scenario => Vec::new(),
        FocusMode::Entity => detail
            .editable
            .iter()
            .filter(|col| !schema.is_label_column(col))
            .cloned()
            .collect(),
    };

    rsx! {
        div { class: "card",
            div { class: "card-header", "Scenario Control per Time Step" }
            div { class: "detail-heading", id: "detail-heading",
                span { "Well Name: " strong { "{detail.entity}" } }
                if let Some(scenario) = detail.scenario.as_ref() {
                    span { "Scenario: " strong { "{scenario}" } }
                }
            }
            div { class: "detail-actions",
                p { class: "hint", "Enter a value for each time step or select 'Update All' to enter a constant value." }
                button {
                    class: "toolbar-btn",
                    id: "btn-update-all",
                    onclick: move |_| {
                        let mut show_bulk = show_bulk;
                        show_bulk.set(true);
                    },
                    "Update All"
                }
            }
            if *show_bulk.read() {
                BulkDialog { session, error_message, show: show_bulk, options: bulk_options.clone() }
            }
            div { class: "table-container", id: "detail-container",
                table {
                    thead {
                        tr {
                            for col in &detail.columns {
                                th { id: format!("detail-col-{}", sanitize_id(col)), "{col}" }
                            }
                        }
                    }
                    tbody {
                        for (index, row) in detail.rows.iter().enumerate() {
                            DetailRow {
                                index,
                                row_key: row.get(&id_column).map(data_model::display_value).unwrap_or_default(),
                                cells: detail
                                    .columns
                                    .iter()
                                    .map(|col| row.get(col).map(data_model::display_value).unwrap_or_default())
                                    .collect::<Vec<String>>(),
                                drafts: detail
                                    .columns
                                    .iter()
                                    .map(|col| row.get(col).map(data_model::edit_text).unwrap_or_default())
                                    .collect::<Vec<String>>(),
                                classes: cell_classes(&detail, index),
                                columns: detail.columns.clone(),
                                editable: detail.editable.clone(),
                                session,
                                error_message,
                                editing,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DetailRow(
    index: usize,
    row_key: String,
    cells: Vec<String>,
    drafts: Vec<String>,
    classes: Vec<String>,
    columns: Vec<String>,
    editable: Vec<String>,
    session: Signal<SessionController>,
    error_message: Signal<Option<String>>,
    editing: Signal<Option<EditingCell>>,
) -> Element {
    rsx! {
        tr { class: if index % 2 == 0 { "even" } else { "odd" }, id: format!("detail-row-{row_key}"),
            for (col, ((text, exact), class)) in columns.iter().zip(cells.iter().zip(drafts.iter()).zip(classes.iter())) {
                if editing
                    .read()
                    .as_ref()
                    .map(|cell| cell.row_key == row_key && cell.column == col.as_str())
                    .unwrap_or(false)
                {
                    td { class: "editing-cell",
                        input {
                            class: "cell-input",
                            id: format!("cell-input-{}-{}", row_key, sanitize_id(col)),
                            value: "{editing.read().as_ref().map(|cell| cell.draft.clone()).unwrap_or_default()}",
                            autofocus: true,
                            oninput: move |evt| {
                                let value = evt.value();
                                let mut editing = editing;
                                editing.with_mut(|cell| {
                                    if let Some(cell) = cell {
                                        cell.draft = value;
                                    }
                                });
                            },
                            onblur: move |_| {
                                commit_edit(session, error_message, editing);
                            },
                            onkeydown: move |evt| {
                                match evt.key() {
                                    Key::Enter => commit_edit(session, error_message, editing),
                                    Key::Escape => {
                                        let mut editing = editing;
                                        editing.set(None);
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                } else {
                    td {
                        class: "{class}",
                        id: format!("cell-{}-{}", row_key, sanitize_id(col)),
                        onclick: {
                            let is_editable = editable.contains(col);
                            let row_key = row_key.clone();
                            let col_name = col.clone();
                            let draft = exact.clone();
                            move |_| {
                                if !is_editable {
                                    return;
                                }
                                let mut editing = editing;
                                editing.set(Some(EditingCell {
                                    row_key: row_key.clone(),
                                    column: col_name.clone(),
                                    original: draft.clone(),
                                    draft: draft.clone(),
                                }));
                            }
                        },
                        "{text}"
                    }
                }
            }
        }
    }
}

/// Constant overwrite for the focused well. An empty `options` list means the
/// focused scenario column is the only target.
#[component]
fn BulkDialog(
    session: Signal<SessionController>,
    error_message: Signal<Option<String>>,
    show: Signal<bool>,
    options: Vec<String>,
) -> Element {
    let input = use_signal(String::new);
    let column = use_signal::<Option<String>>(|| None);

    let needs_column = !options.is_empty();
    let ready = session::parse_constant(&input.read()).is_some()
        && (!needs_column || column.read().is_some());

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", id: "modal-update-all",
                if needs_column {
                    p { "Select an optimization parameter:" }
                    select {
                        class: "toolbar-select",
                        id: "param-select",
                        onchange: move |evt| {
                            let value = evt.value();
                            let mut column = column;
                            column.set(if value.is_empty() { None } else { Some(value) });
                        },
                        option { value: "", "Parameter" }
                        for opt in &options {
                            option { value: "{opt}", "{opt}" }
                        }
                    }
                }
                p { "Enter value to overwrite for all time steps." }
                input {
                    class: "toolbar-input",
                    id: "control-input",
                    r#type: "number",
                    value: "{input.read()}",
                    oninput: move |evt| {
                        let mut input = input;
                        input.set(evt.value());
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "toolbar-btn",
                        id: "confirm-update-all",
                        disabled: !ready,
                        onclick: move |_| {
                            let event = UiEvent::BulkConfirmed {
                                column: column.read().clone(),
                                value: Some(input.read().clone()),
                            };
                            actions::dispatch(session, error_message, event);
                            let mut show = show;
                            show.set(false);
                        },
                        "Confirm"
                    }
                    button {
                        class: "toolbar-btn",
                        id: "cancel-update-all",
                        onclick: move |_| {
                            let mut show = show;
                            show.set(false);
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}

fn cell_classes(detail: &DetailView, index: usize) -> Vec<String> {
    detail
        .columns
        .iter()
        .map(|col| {
            let base = if detail.editable.contains(col) {
                "cell editable"
            } else {
                "cell"
            };
            if detail.is_flagged(index, col) {
                join_classes(base, "out-of-bounds")
            } else {
                base.to_string()
            }
        })
        .collect()
}

fn commit_edit(
    session: Signal<SessionController>,
    error_message: Signal<Option<String>>,
    mut editing: Signal<Option<EditingCell>>,
) {
    let edit = editing.read().as_ref().cloned();
    if let Some(edit) = edit.filter(|edit| edit.draft != edit.original) {
        actions::dispatch(
            session,
            error_message,
            UiEvent::DetailCellEdited {
                row: Some(edit.row_key),
                column: Some(edit.column),
                value: Some(edit.draft),
            },
        );
    }
    editing.set(None);
}
