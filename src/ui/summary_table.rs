use dioxus::prelude::*;

use crate::state::aggregate::VARYING;
use crate::state::data_model;
use crate::state::reconcile::Focus;
use crate::state::session::{SessionController, UiEvent, ViewState};
use crate::ui::{actions, join_classes, sanitize_id};

#[component]
pub fn SummaryTable(
    session: Signal<SessionController>,
    error_message: Signal<Option<String>>,
) -> Element {
    let frame = session.read().frame();
    let schema = session.read().schema().clone();

    if frame.view == ViewState::Initial {
        return rsx! {
            p { class: "empty-message", id: "empty-message", "No data loaded. Click \"Open\" to load a CSV file." }
        };
    }

    let columns = frame.summary.columns().to_vec();
    let deletable: Vec<String> = columns
        .iter()
        .filter(|col| !schema.is_structural(col))
        .cloned()
        .collect();

    rsx! {
        div { class: "card",
            div { class: "card-header", "Scenario Control per Well" }
            p { class: "hint", "Click on a well scenario to edit controls for each time step." }
            div { class: "table-container", id: "summary-container",
                table {
                    thead {
                        tr {
                            for col in &columns {
                                th { id: format!("summary-col-{}", sanitize_id(col)),
                                    span { "{col}" }
                                    if deletable.contains(col) {
                                        button {
                                            class: "delete-col",
                                            id: format!("btn-delete-{}", sanitize_id(col)),
                                            title: "Delete column",
                                            onclick: {
                                                let rendered: Vec<String> = columns
                                                    .iter()
                                                    .filter(|c| *c != col)
                                                    .cloned()
                                                    .collect();
                                                move |_| {
                                                    actions::dispatch(
                                                        session,
                                                        error_message,
                                                        UiEvent::RenderedColumnsChanged {
                                                            columns: rendered.clone(),
                                                        },
                                                    );
                                                }
                                            },
                                            "\u{2715}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        for (index, row) in frame.summary.rows().iter().enumerate() {
                            tr {
                                class: if index % 2 == 0 { "even" } else { "odd" },
                                id: format!("summary-row-{index}"),
                                for col in &columns {
                                    td {
                                        class: cell_class(
                                            &frame.focus,
                                            frame.summary.row_key(index).as_deref(),
                                            col,
                                            row.get(col),
                                        ),
                                        onclick: {
                                            let row_key = frame.summary.row_key(index);
                                            let col_name = col.clone();
                                            move |_| {
                                                actions::dispatch(
                                                    session,
                                                    error_message,
                                                    UiEvent::SummaryCellSelected {
                                                        row: row_key.clone(),
                                                        column: Some(col_name.clone()),
                                                    },
                                                );
                                            }
                                        },
                                        "{row.get(col).map(data_model::display_value).unwrap_or_default()}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn cell_class(
    focus: &Focus,
    row_key: Option<&str>,
    column: &str,
    value: Option<&serde_json::Value>,
) -> String {
    let selected = focus.entity.as_deref() == row_key
        && row_key.is_some()
        && focus
            .column
            .as_deref()
            .map(|focused| focused == column)
            .unwrap_or(true);
    let varying = matches!(value, Some(serde_json::Value::String(s)) if s == VARYING);

    join_classes(
        if selected { "cell selected-cell" } else { "cell" },
        if varying { "varying" } else { "" },
    )
}
